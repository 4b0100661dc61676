//! Request dispatching.
//!
//! Serves the most severe pending request from the nearest center that can
//! cover all of it:
//!
//! 1. Pop the head of the [`RequestQueue`](crate::requests::RequestQueue).
//! 2. Scan the [`CenterIndex`](crate::centers::CenterIndex) in order and keep
//!   the centers whose stock covers every requested category.
//! 3. Rank those by shortest travel distance to the victim; the first center
//!   in scan order wins a tie.
//! 4. Debit the winner's stock by the requested quantities.
//!
//! A request that no center can cover is dropped, not re-queued.
//!
//! # Design
//!
//! The engine borrows the queue and index mutably for the whole call, so
//! the eligibility check and the debit form one unit: no other dispatch can
//! touch the same stock in between.

mod config;
mod engine;
mod types;

pub use config::DispatchConfig;
pub use engine::{Candidate, DispatchEngine};
pub use types::{Dispatch, DispatchOutcome};
