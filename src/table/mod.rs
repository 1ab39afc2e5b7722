//! A single table: columns, rows, and the per-column AVL/B+ indices that
//! back `WHERE`-clause access-path selection.

mod error;
#[cfg(test)]
mod tests;

pub use error::{TableError, TableResult};

use std::fs;
use std::path::Path;

use ahash::AHashMap;

use crate::index::{AvlTree, BPlusTree};
use crate::parser::{Condition, Operator};
use crate::record::Record;

/// Coerce a field's textual value to a number, per the documented
/// fallback rule: anything that doesn't parse is treated as zero rather
/// than rejected.
fn to_number(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Fixed-point scale used to key the B+ tree on `to_number`'s full value
/// instead of its integer part — a plain `as i64` cast would collapse
/// every fractional value between two integers onto the same key, which
/// disagrees with the `f64` comparison `matches_condition` uses for `=`
/// and `!=` on the same column.
const KEY_SCALE: f64 = 1_000_000.0;

fn numeric_key(value: &str) -> i64 {
    let scaled = to_number(value) * KEY_SCALE;
    if scaled >= i64::MAX as f64 {
        i64::MAX
    } else if scaled <= i64::MIN as f64 {
        i64::MIN
    } else {
        scaled.round() as i64
    }
}

fn matches_condition(field: &str, op: Operator, value: &str) -> bool {
    match op {
        Operator::Eq => field == value,
        Operator::Ne => field != value,
        Operator::Gt => to_number(field) > to_number(value),
        Operator::Lt => to_number(field) < to_number(value),
        Operator::Ge => to_number(field) >= to_number(value),
        Operator::Le => to_number(field) <= to_number(value),
    }
}

pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Record>,
    avl_indices: AHashMap<String, AvlTree<String, usize>>,
    bplus_indices: AHashMap<String, BPlusTree>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
            avl_indices: AHashMap::default(),
            bplus_indices: AHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    fn evaluate_condition(&self, row: &Record, cond: &Condition) -> bool {
        match self.column_index(&cond.column) {
            Some(idx) => matches_condition(row.get(idx).unwrap_or(""), cond.op, &cond.value),
            None => false,
        }
    }

    /// Append a row, failing if its field count doesn't match the
    /// table's column count. Updates both indices incrementally.
    pub fn insert(&mut self, record: Record) -> TableResult<()> {
        if record.len() != self.columns.len() {
            return Err(TableError::ColumnCountMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: record.len(),
            });
        }

        let row_idx = self.rows.len();
        for (col_idx, column) in self.columns.iter().enumerate() {
            let value = record.get(col_idx).unwrap_or("").to_string();
            self.avl_indices
                .entry(column.clone())
                .or_default()
                .insert(value.clone(), row_idx);
            self.bplus_indices
                .entry(column.clone())
                .or_default()
                .insert(numeric_key(&value), row_idx)
                .expect("bplus arena invariants hold for in-memory inserts");
        }
        self.rows.push(record);
        Ok(())
    }

    /// Remove every row matching `cond`, rebuilding both indices if
    /// anything was removed. Returns the number of rows removed.
    pub fn delete_where(&mut self, cond: &Condition) -> usize {
        let cond_idx = self.column_index(&cond.column);
        let before = self.rows.len();
        self.rows.retain(|row| match cond_idx {
            Some(idx) => !matches_condition(row.get(idx).unwrap_or(""), cond.op, &cond.value),
            None => true,
        });
        let removed = before - self.rows.len();
        if removed > 0 {
            self.rebuild_indices();
        }
        removed
    }

    /// Apply `updates` to every row matching `cond`, rebuilding indices
    /// if anything changed. Returns the number of rows updated.
    pub fn update_where(&mut self, updates: &[(String, String)], cond: &Condition) -> usize {
        let cond_idx = self.column_index(&cond.column);
        let update_idxs: Vec<(usize, String)> = updates
            .iter()
            .filter_map(|(col, val)| self.column_index(col).map(|idx| (idx, val.clone())))
            .collect();

        let mut changed = 0;
        for row in self.rows.iter_mut() {
            let matches = match cond_idx {
                Some(idx) => matches_condition(row.get(idx).unwrap_or(""), cond.op, &cond.value),
                None => false,
            };
            if matches {
                for (idx, value) in &update_idxs {
                    let _ = row.set(*idx, value.clone());
                }
                changed += 1;
            }
        }
        if changed > 0 {
            self.rebuild_indices();
        }
        changed
    }

    pub fn select_all(&self) -> Vec<Record> {
        self.rows.clone()
    }

    /// Access-path selection: exact match via AVL, range via B+ tree,
    /// `!=` via linear scan.
    pub fn select_where(&self, cond: &Condition) -> Vec<Record> {
        let Some(idx) = self.column_index(&cond.column) else {
            return Vec::new();
        };
        let column = &self.columns[idx];

        match cond.op {
            Operator::Eq => self
                .avl_indices
                .get(column)
                .and_then(|tree| tree.find(&cond.value))
                .map(|&row_idx| vec![self.rows[row_idx].clone()])
                .unwrap_or_default(),

            Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le => {
                let Some(tree) = self.bplus_indices.get(column) else {
                    return Vec::new();
                };
                let key = numeric_key(&cond.value);
                let (lower, upper) = match cond.op {
                    Operator::Gt => (key.saturating_add(1), i64::MAX),
                    Operator::Lt => (i64::MIN, key.saturating_sub(1)),
                    Operator::Ge => (key, i64::MAX),
                    Operator::Le => (i64::MIN, key),
                    Operator::Eq | Operator::Ne => unreachable!(),
                };
                tree.range_search(lower, upper)
                    .into_iter()
                    .map(|(_, row_idx)| self.rows[row_idx].clone())
                    .collect()
            }

            Operator::Ne => self
                .rows
                .iter()
                .filter(|row| self.evaluate_condition(row, cond))
                .cloned()
                .collect(),
        }
    }

    fn field_value(&self, row: &Record, column: &str) -> String {
        self.column_index(column)
            .and_then(|idx| row.get(idx).ok())
            .unwrap_or("")
            .to_string()
    }

    /// Order `rows` by a column's string value via a freshly built AVL
    /// tree, keeping insertion order among equal keys. Takes the already
    /// filtered record set (e.g. from `select_where`) rather than the
    /// whole table, so `WHERE ... ORDER BY` orders only the matching rows.
    pub fn order_rows(&self, rows: &[Record], column: &str, desc: bool) -> Vec<Record> {
        if self.column_index(column).is_none() {
            return Vec::new();
        }

        let mut tree: AvlTree<String, Vec<usize>> = AvlTree::new();
        for (i, row) in rows.iter().enumerate() {
            let key = self.field_value(row, column);
            let mut bucket = tree.find(&key).cloned().unwrap_or_default();
            bucket.push(i);
            tree.insert(key, bucket);
        }

        let mut ordered: Vec<usize> = tree.in_order().into_iter().flat_map(|(_, v)| v.clone()).collect();
        if desc {
            ordered.reverse();
        }
        ordered.into_iter().map(|i| rows[i].clone()).collect()
    }

    /// One synthetic `(value, count)` row per distinct value of `column`
    /// across `rows`, ordered ascending by value. Takes the already
    /// filtered record set (e.g. from `select_where`) rather than the
    /// whole table, so `WHERE ... GROUP BY` groups only the matching rows.
    pub fn group_rows(&self, rows: &[Record], column: &str) -> Vec<(String, usize)> {
        if self.column_index(column).is_none() {
            return Vec::new();
        }

        let mut counts: AvlTree<String, usize> = AvlTree::new();
        for row in rows {
            let key = self.field_value(row, column);
            let count = counts.find(&key).copied().unwrap_or(0) + 1;
            counts.insert(key, count);
        }
        counts.in_order().into_iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    fn rebuild_indices(&mut self) {
        self.avl_indices.clear();
        self.bplus_indices.clear();
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, column) in self.columns.iter().enumerate() {
                let value = row.get(col_idx).unwrap_or("");
                self.avl_indices
                    .entry(column.clone())
                    .or_default()
                    .insert(value.to_string(), row_idx);
                self.bplus_indices
                    .entry(column.clone())
                    .or_default()
                    .insert(numeric_key(value), row_idx)
                    .expect("bplus arena invariants hold for in-memory inserts");
            }
        }
    }

    /// Build a new table with `new_columns`, re-inserting every existing
    /// row: fields for columns that survive are carried over, fields for
    /// newly added columns are padded with an empty string, and fields
    /// for columns that no longer appear are dropped. Used by both
    /// `ALTER TABLE ADD` and `ALTER TABLE DROP`.
    pub fn rebuild_with_columns(&self, new_columns: Vec<String>) -> Table {
        let mut rebuilt = Table::new(self.name.clone(), new_columns);
        for row in &self.rows {
            let fields: Vec<String> = rebuilt
                .columns
                .iter()
                .map(|col| self.field_value(row, col))
                .collect();
            rebuilt
                .insert(Record::new(fields))
                .expect("rebuilt record matches new column count by construction");
        }
        rebuilt
    }

    pub fn add_column(&self, name: &str) -> Table {
        let mut new_columns = self.columns.clone();
        new_columns.push(name.to_string());
        self.rebuild_with_columns(new_columns)
    }

    pub fn drop_column(&self, name: &str) -> Table {
        let new_columns: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !c.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        self.rebuild_with_columns(new_columns)
    }

    /// Write the header line followed by one CSV line per row.
    pub fn save(&self, path: &Path) -> TableResult<()> {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.to_line());
            out.push('\n');
        }
        fs::write(path, out)?;
        Ok(())
    }

    /// Read the header line to recover column names, then one record per
    /// non-empty subsequent line, rebuilding indices as rows are added.
    pub fn load(name: &str, path: &Path) -> TableResult<Table> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();
        let header = lines
            .next()
            .ok_or_else(|| TableError::MissingHeader(path.display().to_string()))?;
        let columns: Vec<String> = header.split(',').map(str::to_string).collect();

        let mut table = Table::new(name, columns);
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            table.insert(Record::from_line(line))?;
        }
        Ok(table)
    }
}
