//! Disaster-relief dispatch engine.
//!
//! Matches relief supply to victim requests across a network of locations:
//!
//! - **Location graph**: Undirected weighted graph over every registered
//!   center and victim, with early-exit Dijkstra distance queries and
//!   breadth-first traversal.
//! - **Center index**: Binary search tree of relief centers keyed by
//!   center ID, supporting exact lookup, in-order scans and deletion with
//!   in-order successor promotion.
//! - **Request queue**: Victim requests ordered by severity, first-come
//!   first-served among equal severity.
//! - **Dispatching**: Serves the most severe pending request from the
//!   nearest center whose stock covers the whole request, and debits it.
//! - **Relief network**: Facade that owns all of the above and exposes
//!   registration, lookup, replenishment, auditing and dispatch.
//!
//! # Architecture
//!
//! Centers and victims share one graph ID space ([`graph::GraphId`]),
//! assigned by the graph's own counter. Center IDs and victim IDs are
//! operator-chosen and live in separate typed key spaces, so they cannot be
//! confused with graph IDs in lookups.
//!
//! All operations are synchronous and run to completion. [`relief::ReliefNetwork`]
//! takes `&mut self` for every mutation, so the eligibility check and the
//! debit of one dispatch can never interleave with another dispatch.

pub mod centers;
pub mod dispatching;
pub mod error;
pub mod graph;
pub mod relief;
pub mod requests;

pub use error::ReliefError;
