//! Relief center index.
//!
//! Centers are kept in a binary search tree keyed by [`CenterId`]. The tree
//! is not self-balancing: center IDs are assigned by operators, not by an
//! adversary, so plain BST behavior is enough.
//!
//! Nodes live in an arena and link to each other by slot index. Deleting a
//! node with two children copies the in-order successor's key and payload
//! into the doomed slot and frees the successor's slot instead. The
//! recycled slot keeps its original graph ID.

mod index;
mod types;

pub use index::{CenterIndex, Entries, NodeHandle, Promotion, Removal};
pub use types::{Center, CenterId, ResourceMap};
