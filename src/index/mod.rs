//! Per-column index structures backing a table's access paths: an AVL
//! tree for exact-match lookups and a B+ tree for ordered range scans.

mod avl;
mod bplus;

pub use avl::AvlTree;
pub use bplus::{BPlusKey, BPlusTree};
