//! Victim request queue.
//!
//! Pending requests are served most severe first. Among requests of equal
//! severity, the one enqueued first is served first.

mod queue;
mod types;

pub use queue::RequestQueue;
pub use types::{Priority, Victim, VictimId};
