//! Severity-ordered FIFO of victim requests.

use super::types::{Priority, Victim};
use std::collections::VecDeque;

/// Pending victim requests in service order.
///
/// A new request is placed after every entry whose priority is greater than
/// or equal to its own, so equal priorities keep arrival order.
///
/// # Examples
///
/// ```
/// use u_relief::graph::GraphId;
/// use u_relief::requests::{Priority, RequestQueue, Victim, VictimId};
///
/// let mut queue = RequestQueue::new();
/// for (i, level) in [3, 5, 3, 1].into_iter().enumerate() {
///     let id = i as u32;
///     let priority = Priority::new(level).unwrap();
///     queue.enqueue(Victim::new(GraphId(id as u64), VictimId(id), "camp", priority, Default::default()));
/// }
/// let order: Vec<u32> = std::iter::from_fn(|| queue.dequeue()).map(|v| v.victim_id.0).collect();
/// assert_eq!(order, vec![1, 0, 2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    entries: VecDeque<Victim>,
}

impl RequestQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request behind every request of equal or higher priority.
    pub fn enqueue(&mut self, victim: Victim) {
        let at = self.insertion_point(victim.priority);
        self.entries.insert(at, victim);
    }

    fn insertion_point(&self, priority: Priority) -> usize {
        self.entries.partition_point(|queued| queued.priority >= priority)
    }

    /// Removes and returns the next request to serve.
    pub fn dequeue(&mut self) -> Option<Victim> {
        self.entries.pop_front()
    }

    /// The next request to serve, without removing it.
    pub fn peek(&self) -> Option<&Victim> {
        self.entries.front()
    }

    /// Pending requests in service order.
    pub fn iter(&self) -> impl Iterator<Item = &Victim> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
