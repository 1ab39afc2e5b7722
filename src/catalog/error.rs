use std::io;
use thiserror::Error;

use crate::table::TableError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no database selected")]
    NoDatabaseSelected,

    #[error("database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("database '{0}' does not exist")]
    DatabaseNotFound(String),

    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("DELETE requires a WHERE clause")]
    MissingWhereClause,

    #[error("UPDATE requires a WHERE clause and at least one assignment")]
    MissingUpdateClause,

    #[error("invalid query")]
    InvalidQuery,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
