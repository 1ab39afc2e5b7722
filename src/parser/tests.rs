use super::*;
use crate::lexer::lex;

fn parse_sql(sql: &str) -> ParsedQuery {
    parse(&lex(sql))
}

#[test]
fn create_database() {
    let q = parse_sql("CREATE DATABASE shop");
    assert_eq!(q.kind(), QueryKind::CreateDatabase);
    assert_eq!(q.database_name, "shop");
}

#[test]
fn use_database() {
    let q = parse_sql("USE shop");
    assert_eq!(q.kind(), QueryKind::UseDatabase);
    assert_eq!(q.database_name, "shop");
}

#[test]
fn drop_database_is_distinguished_from_drop_table() {
    let db = parse_sql("DROP DATABASE shop");
    assert_eq!(db.kind(), QueryKind::DropDatabase);
    assert_eq!(db.database_name, "shop");

    let table = parse_sql("DROP TABLE users");
    assert_eq!(table.kind(), QueryKind::DropTable);
    assert_eq!(table.table_name, "users");
}

#[test]
fn create_table_collects_column_names_and_discards_types() {
    let q = parse_sql("CREATE TABLE users (id INT, name TEXT, age INT)");
    assert_eq!(q.kind(), QueryKind::CreateTable);
    assert_eq!(q.table_name, "users");
    assert_eq!(q.columns, vec!["id", "name", "age"]);
}

#[test]
fn alter_table_add_column() {
    let q = parse_sql("ALTER TABLE users ADD email TEXT");
    assert_eq!(q.kind(), QueryKind::AlterTable);
    assert_eq!(q.alter_action, Some(AlterAction::Add));
    assert_eq!(q.alter_column_name.as_deref(), Some("email"));
    assert_eq!(q.alter_column_type.as_deref(), Some("text"));
}

#[test]
fn alter_table_drop_column() {
    let q = parse_sql("ALTER TABLE users DROP email");
    assert_eq!(q.kind(), QueryKind::AlterTable);
    assert_eq!(q.alter_action, Some(AlterAction::Drop));
    assert_eq!(q.alter_column_name.as_deref(), Some("email"));
    assert_eq!(q.alter_column_type, None);
}

#[test]
fn insert_values() {
    let q = parse_sql("INSERT INTO users VALUES (1, 'Alice', 30)");
    assert_eq!(q.kind(), QueryKind::Insert);
    assert_eq!(q.table_name, "users");
    assert_eq!(q.values, vec!["1", "Alice", "30"]);
}

#[test]
fn select_star_with_where() {
    let q = parse_sql("SELECT * FROM users WHERE id = 1");
    assert_eq!(q.kind(), QueryKind::Select);
    assert!(q.select_all);
    assert_eq!(q.table_name, "users");
    assert_eq!(
        q.conditions,
        vec![Condition {
            column: "id".to_string(),
            op: Operator::Eq,
            value: "1".to_string(),
        }]
    );
}

#[test]
fn select_specific_columns() {
    let q = parse_sql("SELECT id, name FROM users");
    assert!(!q.select_all);
    assert_eq!(q.select_columns, vec!["id", "name"]);
}

#[test]
fn select_with_order_by_desc() {
    let q = parse_sql("SELECT * FROM users ORDER BY age DESC");
    assert_eq!(q.order_by_column.as_deref(), Some("age"));
    assert!(q.order_by_desc);
}

#[test]
fn select_with_order_by_asc_is_not_desc() {
    let q = parse_sql("SELECT * FROM users ORDER BY age ASC");
    assert_eq!(q.order_by_column.as_deref(), Some("age"));
    assert!(!q.order_by_desc);
}

#[test]
fn select_with_group_by() {
    let q = parse_sql("SELECT * FROM users GROUP BY age");
    assert_eq!(q.group_by_column.as_deref(), Some("age"));
}

#[test]
fn delete_with_condition() {
    let q = parse_sql("DELETE FROM users WHERE id != 3");
    assert_eq!(q.kind(), QueryKind::Delete);
    assert_eq!(q.conditions[0].op, Operator::Ne);
}

#[test]
fn delete_without_condition_still_parses() {
    let q = parse_sql("DELETE FROM users");
    assert_eq!(q.kind(), QueryKind::Delete);
    assert!(q.conditions.is_empty());
}

#[test]
fn update_multiple_assignments_with_condition() {
    let q = parse_sql("UPDATE users SET name = 'Bob', age = 31 WHERE id = 1");
    assert_eq!(q.kind(), QueryKind::Update);
    assert_eq!(
        q.updates,
        vec![
            ("name".to_string(), "Bob".to_string()),
            ("age".to_string(), "31".to_string()),
        ]
    );
    assert_eq!(q.conditions[0].value, "1");
}

#[test]
fn comparison_operators_round_trip() {
    for (text, expected) in [
        ("=", Operator::Eq),
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        (">=", Operator::Ge),
        ("<=", Operator::Le),
    ] {
        let sql = format!("SELECT * FROM t WHERE id {text} 1");
        let q = parse_sql(&sql);
        assert_eq!(q.conditions[0].op, expected, "operator {text}");
    }
}

#[test]
fn garbage_input_is_invalid() {
    let q = parse_sql("banana banana");
    assert!(!q.is_valid());
}

#[test]
fn empty_input_is_invalid() {
    let q = parse_sql("");
    assert!(!q.is_valid());
}
