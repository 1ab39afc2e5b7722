//! The catalog: the in-memory map of databases and tables, the current
//! database pointer, and the single `execute` entry point the CLI drives.

mod error;

pub use error::{CatalogError, CatalogResult};

use std::fs;
use std::path::PathBuf;

use ahash::AHashMap;

use crate::display;
use crate::lexer::lex;
use crate::parser::{AlterAction, ParsedQuery, QueryKind, parse};
use crate::record::Record;
use crate::table::Table;

fn project_row(table: &Table, row: &Record, wanted: &[String]) -> Record {
    let fields = wanted
        .iter()
        .map(|col| {
            table
                .columns()
                .iter()
                .position(|c| c.eq_ignore_ascii_case(col))
                .and_then(|idx| row.get(idx).ok())
                .unwrap_or("")
                .to_string()
        })
        .collect();
    Record::new(fields)
}

/// Named databases, each a named map of tables, plus the process-wide
/// current-database selection.
pub struct Catalog {
    base_dir: PathBuf,
    databases: AHashMap<String, AHashMap<String, Table>>,
    current_db: Option<String>,
}

impl Catalog {
    /// Reconstruct a catalog from disk: every subdirectory of `base_dir`
    /// becomes a database, every `*.tbl` file within becomes a table.
    pub fn new(base_dir: impl Into<PathBuf>) -> CatalogResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        let mut databases = AHashMap::default();

        for entry in fs::read_dir(&base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let db_name = entry.file_name().to_string_lossy().into_owned();
            let mut tables = AHashMap::default();

            for file in fs::read_dir(entry.path())? {
                let file = file?;
                let path = file.path();
                if path.extension().and_then(|e| e.to_str()) != Some("tbl") {
                    continue;
                }
                let Some(table_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned())
                else {
                    continue;
                };
                let table = Table::load(&table_name, &path)?;
                tables.insert(table_name, table);
            }
            databases.insert(db_name, tables);
        }

        Ok(Self {
            base_dir,
            databases,
            current_db: None,
        })
    }

    pub fn current_database(&self) -> String {
        self.current_db.clone().unwrap_or_else(|| "(none)".to_string())
    }

    fn db_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn table_path(&self, db: &str, table: &str) -> PathBuf {
        self.db_dir(db).join(format!("{table}.tbl"))
    }

    fn current_db_name(&self) -> CatalogResult<String> {
        self.current_db.clone().ok_or(CatalogError::NoDatabaseSelected)
    }

    fn current_tables(&self) -> CatalogResult<&AHashMap<String, Table>> {
        let name = self.current_db_name()?;
        self.databases.get(&name).ok_or(CatalogError::DatabaseNotFound(name))
    }

    fn current_tables_mut(&mut self) -> CatalogResult<&mut AHashMap<String, Table>> {
        let name = self.current_db_name()?;
        self.databases.get_mut(&name).ok_or(CatalogError::DatabaseNotFound(name))
    }

    /// Lex, parse, and dispatch `query_text`, collapsing any error into a
    /// one-line display string. Never lets an `Err` cross this boundary.
    pub fn execute(&mut self, query_text: &str) -> String {
        let tokens = lex(query_text);
        let query = parse(&tokens);
        match self.dispatch(&query) {
            Ok(message) => message,
            Err(err) => display::error_line(&err.to_string()),
        }
    }

    fn dispatch(&mut self, q: &ParsedQuery) -> CatalogResult<String> {
        match q.kind() {
            QueryKind::CreateDatabase => self.create_database(&q.database_name),
            QueryKind::UseDatabase => self.use_database(&q.database_name),
            QueryKind::DropDatabase => self.drop_database(&q.database_name),
            QueryKind::CreateTable => self.create_table(&q.table_name, &q.columns),
            QueryKind::DropTable => self.drop_table(&q.table_name),
            QueryKind::AlterTable => self.alter_table(q),
            QueryKind::Insert => self.insert(&q.table_name, &q.values),
            QueryKind::Select => self.select(q),
            QueryKind::Update => self.update(q),
            QueryKind::Delete => self.delete(q),
            QueryKind::Invalid => Err(CatalogError::InvalidQuery),
        }
    }

    fn create_database(&mut self, name: &str) -> CatalogResult<String> {
        if self.databases.contains_key(name) {
            return Err(CatalogError::DatabaseAlreadyExists(name.to_string()));
        }
        fs::create_dir_all(self.db_dir(name))?;
        self.databases.insert(name.to_string(), AHashMap::default());
        Ok(display::success_line(&format!("database '{name}' created")))
    }

    fn use_database(&mut self, name: &str) -> CatalogResult<String> {
        if !self.databases.contains_key(name) {
            return Err(CatalogError::DatabaseNotFound(name.to_string()));
        }
        self.current_db = Some(name.to_string());
        Ok(display::success_line(&format!("using database '{name}'")))
    }

    fn drop_database(&mut self, name: &str) -> CatalogResult<String> {
        if !self.databases.contains_key(name) {
            return Err(CatalogError::DatabaseNotFound(name.to_string()));
        }
        fs::remove_dir_all(self.db_dir(name))?;
        self.databases.remove(name);
        if self.current_db.as_deref() == Some(name) {
            self.current_db = None;
        }
        Ok(display::success_line(&format!("database '{name}' dropped")))
    }

    fn create_table(&mut self, table_name: &str, columns: &[String]) -> CatalogResult<String> {
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, table_name);
        let tables = self.current_tables_mut()?;
        if tables.contains_key(table_name) {
            return Err(CatalogError::TableAlreadyExists(table_name.to_string()));
        }
        let table = Table::new(table_name, columns.to_vec());
        table.save(&path)?;
        tables.insert(table_name.to_string(), table);
        Ok(display::success_line(&format!("table '{table_name}' created")))
    }

    fn drop_table(&mut self, table_name: &str) -> CatalogResult<String> {
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, table_name);
        let tables = self.current_tables_mut()?;
        if tables.remove(table_name).is_none() {
            return Err(CatalogError::TableNotFound(table_name.to_string()));
        }
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(display::success_line(&format!("table '{table_name}' dropped")))
    }

    fn alter_table(&mut self, q: &ParsedQuery) -> CatalogResult<String> {
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, &q.table_name);
        let column_name = q.alter_column_name.clone().ok_or(CatalogError::InvalidQuery)?;
        let action = q.alter_action.ok_or(CatalogError::InvalidQuery)?;

        let tables = self.current_tables_mut()?;
        let existing = tables
            .get(&q.table_name)
            .ok_or_else(|| CatalogError::TableNotFound(q.table_name.clone()))?;

        let message = match action {
            AlterAction::Add => {
                let rebuilt = existing.add_column(&column_name);
                rebuilt.save(&path)?;
                tables.insert(q.table_name.clone(), rebuilt);
                format!("column '{column_name}' added to '{}'", q.table_name)
            }
            AlterAction::Drop => {
                let rebuilt = existing.drop_column(&column_name);
                rebuilt.save(&path)?;
                tables.insert(q.table_name.clone(), rebuilt);
                format!("column '{column_name}' dropped from '{}'", q.table_name)
            }
            AlterAction::Modify => {
                format!("column '{column_name}' type unchanged (types are not enforced)")
            }
        };
        Ok(display::success_line(&message))
    }

    fn insert(&mut self, table_name: &str, values: &[String]) -> CatalogResult<String> {
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, table_name);
        let tables = self.current_tables_mut()?;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))?;
        table.insert(Record::new(values.to_vec()))?;
        table.save(&path)?;
        Ok(display::success_line("1 row inserted"))
    }

    fn select(&self, q: &ParsedQuery) -> CatalogResult<String> {
        let tables = self.current_tables()?;
        let table = tables
            .get(&q.table_name)
            .ok_or_else(|| CatalogError::TableNotFound(q.table_name.clone()))?;

        let rows = match q.conditions.first() {
            Some(cond) => table.select_where(cond),
            None => table.select_all(),
        };

        if let Some(group_col) = &q.group_by_column {
            let groups = table.group_rows(&rows, group_col);
            return Ok(display::render_group_by(group_col, &groups));
        }

        let rows = if let Some(order_col) = &q.order_by_column {
            table.order_rows(&rows, order_col, q.order_by_desc)
        } else {
            rows
        };

        let display_columns: Vec<String> = if q.select_all {
            table.columns().to_vec()
        } else {
            q.select_columns.clone()
        };

        let projected: Vec<Record> = if q.select_all {
            rows
        } else {
            rows.iter().map(|row| project_row(table, row, &q.select_columns)).collect()
        };

        Ok(display::render_rows(&display_columns, &projected))
    }

    fn update(&mut self, q: &ParsedQuery) -> CatalogResult<String> {
        if q.updates.is_empty() || q.conditions.is_empty() {
            return Err(CatalogError::MissingUpdateClause);
        }
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, &q.table_name);
        let tables = self.current_tables_mut()?;
        let table = tables
            .get_mut(&q.table_name)
            .ok_or_else(|| CatalogError::TableNotFound(q.table_name.clone()))?;
        let count = table.update_where(&q.updates, &q.conditions[0]);
        table.save(&path)?;
        Ok(display::success_line(&format!("{count} row(s) updated")))
    }

    fn delete(&mut self, q: &ParsedQuery) -> CatalogResult<String> {
        if q.conditions.is_empty() {
            return Err(CatalogError::MissingWhereClause);
        }
        let db_name = self.current_db_name()?;
        let path = self.table_path(&db_name, &q.table_name);
        let tables = self.current_tables_mut()?;
        let table = tables
            .get_mut(&q.table_name)
            .ok_or_else(|| CatalogError::TableNotFound(q.table_name.clone()))?;
        let count = table.delete_where(&q.conditions[0]);
        table.save(&path)?;
        Ok(display::success_line(&format!("{count} row(s) deleted")))
    }
}
