use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("record has {actual} fields, table {table} expects {expected}")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' does not exist")]
    UnknownColumn(String),

    #[error("io error accessing table file: {0}")]
    Io(#[from] io::Error),

    #[error("table file {0} has no header line")]
    MissingHeader(String),
}

pub type TableResult<T> = Result<T, TableError>;
