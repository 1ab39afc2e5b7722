use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("field index {index} out of bounds (record has {len} fields)")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type RecordResult<T> = Result<T, RecordError>;
