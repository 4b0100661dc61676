//! Graph ID allocation.

use super::types::GraphId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic [`GraphId`] source.
///
/// Owned by the [`super::LocationGraph`] that hands out the IDs, so two
/// networks never share a counter. IDs start at 1.
///
/// # Examples
///
/// ```
/// use u_relief::graph::{GraphId, IdGenerator};
///
/// let ids = IdGenerator::new();
/// assert_eq!(ids.next_id(), GraphId(1));
/// assert_eq!(ids.next_id(), GraphId(2));
/// assert_eq!(ids.peek(), GraphId(3));
/// ```
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Creates a generator whose first ID is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose first ID is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocates the next ID.
    pub fn next_id(&self) -> GraphId {
        GraphId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the ID the next call to [`next_id`](Self::next_id) will hand out.
    pub fn peek(&self) -> GraphId {
        GraphId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
