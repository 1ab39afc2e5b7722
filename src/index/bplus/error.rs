use thiserror::Error;

/// Errors raised by the B+ tree's internal bookkeeping. These only
/// surface if the arena is corrupted (a dangling `NodeId`); a caller
/// driving the tree through its public API should never observe one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BPlusTreeError {
    #[error("b+tree order must be at least 3, got {0}")]
    InvalidOrder(usize),

    #[error("b+tree node {0} not found in arena")]
    NodeNotFound(usize),
}

pub type BPlusTreeResult<T> = Result<T, BPlusTreeError>;
