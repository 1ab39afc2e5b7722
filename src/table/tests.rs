use super::*;
use crate::parser::Operator;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn cond(column: &str, op: Operator, value: &str) -> Condition {
    Condition {
        column: column.to_string(),
        op,
        value: value.to_string(),
    }
}

fn sample_table() -> Table {
    let mut table = Table::new("people", cols(&["id", "name", "age"]));
    table.insert(Record::new(vec!["1".into(), "alice".into(), "30".into()])).unwrap();
    table.insert(Record::new(vec!["2".into(), "bob".into(), "25".into()])).unwrap();
    table.insert(Record::new(vec!["3".into(), "alice".into(), "40".into()])).unwrap();
    table
}

#[test]
fn insert_rejects_wrong_field_count() {
    let mut table = Table::new("t", cols(&["a", "b"]));
    let err = table.insert(Record::new(vec!["1".into()])).unwrap_err();
    assert!(matches!(err, TableError::ColumnCountMismatch { .. }));
}

#[test]
fn select_all_preserves_insertion_order() {
    let table = sample_table();
    let rows = table.select_all();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get(1).unwrap(), "alice");
    assert_eq!(rows[2].get(1).unwrap(), "alice");
}

#[test]
fn select_where_eq_uses_avl_exact_match() {
    let table = sample_table();
    let rows = table.select_where(&cond("id", Operator::Eq, "2"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(1).unwrap(), "bob");
}

#[test]
fn select_where_range_uses_bplus_tree() {
    let table = sample_table();
    let rows = table.select_where(&cond("age", Operator::Gt, "25"));
    let ages: Vec<_> = rows.iter().map(|r| r.get(2).unwrap().to_string()).collect();
    assert_eq!(ages.len(), 2);
    assert!(ages.contains(&"30".to_string()));
    assert!(ages.contains(&"40".to_string()));
}

#[test]
fn select_where_ne_uses_linear_scan() {
    let table = sample_table();
    let rows = table.select_where(&cond("name", Operator::Ne, "alice"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(1).unwrap(), "bob");
}

#[test]
fn select_where_on_unknown_column_is_empty() {
    let table = sample_table();
    assert!(table.select_where(&cond("nope", Operator::Eq, "1")).is_empty());
}

#[test]
fn delete_where_removes_matching_rows_and_rebuilds_indices() {
    let mut table = sample_table();
    let removed = table.delete_where(&cond("name", Operator::Eq, "alice"));
    assert_eq!(removed, 1);
    assert_eq!(table.row_count(), 2);
    // Index coherence: every remaining row must still be reachable by id.
    for row in table.select_all() {
        let id = row.get(0).unwrap();
        assert_eq!(table.select_where(&cond("id", Operator::Eq, id)).len(), 1);
    }
}

#[test]
fn update_where_applies_assignments_to_matching_rows_only() {
    let mut table = sample_table();
    let updated = table.update_where(
        &[("name".to_string(), "zed".to_string())],
        &cond("id", Operator::Eq, "2"),
    );
    assert_eq!(updated, 1);
    let rows = table.select_where(&cond("id", Operator::Eq, "2"));
    assert_eq!(rows[0].get(1).unwrap(), "zed");
    // Unrelated row is untouched.
    let rows = table.select_where(&cond("id", Operator::Eq, "1"));
    assert_eq!(rows[0].get(1).unwrap(), "alice");
}

#[test]
fn order_rows_desc_reverses_ascending_order() {
    let table = sample_table();
    let all = table.select_all();
    let asc = table.order_rows(&all, "age", false);
    let desc = table.order_rows(&all, "age", true);
    let asc_ages: Vec<_> = asc.iter().map(|r| r.get(2).unwrap().to_string()).collect();
    let desc_ages: Vec<_> = desc.iter().map(|r| r.get(2).unwrap().to_string()).collect();
    assert_eq!(asc_ages, vec!["25", "30", "40"]);
    assert_eq!(desc_ages, vec!["40", "30", "25"]);
}

#[test]
fn group_rows_counts_distinct_values_ascending() {
    let table = sample_table();
    let groups = table.group_rows(&table.select_all(), "name");
    assert_eq!(
        groups,
        vec![("alice".to_string(), 2), ("bob".to_string(), 1)]
    );
}

#[test]
fn order_rows_only_orders_the_rows_it_is_given() {
    let table = sample_table();
    let filtered = table.select_where(&cond("age", Operator::Gt, "25"));
    let ordered = table.order_rows(&filtered, "age", false);
    assert_eq!(ordered.len(), 2);
    let ages: Vec<_> = ordered.iter().map(|r| r.get(2).unwrap().to_string()).collect();
    assert_eq!(ages, vec!["30", "40"]);
}

#[test]
fn range_query_on_fractional_values_does_not_truncate_the_bplus_key() {
    let mut table = Table::new("t", cols(&["id", "score"]));
    table.insert(Record::new(vec!["1".into(), "9.7".into()])).unwrap();
    table.insert(Record::new(vec!["2".into(), "9.3".into()])).unwrap();
    let rows = table.select_where(&cond("score", Operator::Gt, "9.5"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0).unwrap(), "1");
}

#[test]
fn add_column_pads_existing_rows_with_empty_string() {
    let table = sample_table();
    let rebuilt = table.add_column("email");
    assert_eq!(rebuilt.columns(), &["id", "name", "age", "email"]);
    for row in rebuilt.select_all() {
        assert_eq!(row.get(3).unwrap(), "");
    }
}

#[test]
fn drop_column_strips_the_field_from_every_row() {
    let table = sample_table();
    let rebuilt = table.drop_column("age");
    assert_eq!(rebuilt.columns(), &["id", "name"]);
    for row in rebuilt.select_all() {
        assert_eq!(row.len(), 2);
    }
}

#[test]
fn save_then_load_round_trips_columns_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.tbl");
    let table = sample_table();
    table.save(&path).unwrap();

    let loaded = Table::load("people", &path).unwrap();
    assert_eq!(loaded.columns(), table.columns());
    assert_eq!(loaded.select_all(), table.select_all());
}

#[test]
fn load_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.tbl");
    std::fs::write(&path, "id,name\n1,a\n\n2,b\n").unwrap();
    let table = Table::load("t", &path).unwrap();
    assert_eq!(table.row_count(), 2);
}

#[test]
fn non_numeric_values_coerce_to_zero_for_range_queries() {
    let mut table = Table::new("t", cols(&["id", "score"]));
    table.insert(Record::new(vec!["1".into(), "not-a-number".into()])).unwrap();
    table.insert(Record::new(vec!["2".into(), "5".into()])).unwrap();
    let rows = table.select_where(&cond("score", Operator::Le, "0"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0).unwrap(), "1");
}
