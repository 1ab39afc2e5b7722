//! A single row of a table: a flat list of string-valued fields, with
//! a comma-joined on-disk representation. There is no quoting or
//! escaping — a field containing a comma is simply indistinguishable
//! from two fields, matching the flat-file format tables persist to.

mod error;

pub use error::{RecordError, RecordResult};

/// A row's values, positionally aligned with the owning table's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    pub fn get(&self, index: usize) -> RecordResult<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or(RecordError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) -> RecordResult<()> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(RecordError::IndexOutOfBounds { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Comma-joined representation, one line per record in a table file.
    pub fn to_line(&self) -> String {
        self.values.join(",")
    }

    /// Parse a comma-joined line back into a record. No quoting is
    /// recognized, so this is the exact inverse of `to_line`.
    pub fn from_line(line: &str) -> Self {
        Self {
            values: line.split(',').map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_line() {
        let record = Record::new(vec!["1".into(), "Alice".into(), "30".into()]);
        let line = record.to_line();
        assert_eq!(line, "1,Alice,30");
        assert_eq!(Record::from_line(&line), record);
    }

    #[test]
    fn get_out_of_bounds_is_an_error() {
        let record = Record::new(vec!["a".into()]);
        assert!(record.get(5).is_err());
    }

    #[test]
    fn set_replaces_an_existing_field() {
        let mut record = Record::new(vec!["a".into(), "b".into()]);
        record.set(1, "c").unwrap();
        assert_eq!(record.get(1).unwrap(), "c");
    }

    #[test]
    fn empty_line_still_yields_one_empty_field() {
        let record = Record::from_line("");
        assert_eq!(record.len(), 1);
        assert_eq!(record.get(0).unwrap(), "");
    }
}
