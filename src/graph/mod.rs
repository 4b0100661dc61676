//! Location graph.
//!
//! An undirected weighted graph over every registered center and victim.
//! Edge weights are pre-supplied travel distances; no coordinate math is
//! performed. The graph indexes entities by [`GraphId`] for display but
//! does not own center or victim records.
//!
//! # Queries
//!
//! - [`LocationGraph::shortest_distance`]: single-pair Dijkstra that stops
//!   as soon as the target is finalized.
//! - [`LocationGraph::breadth_first_order`]: visitation order from a start
//!   node, for display.
//!
//! # References
//!
//! Dijkstra, E. W. (1959). "A note on two problems in connexion with graphs",
//! *Numerische Mathematik* 1, 269-271.

mod config;
mod ids;
mod network;
mod types;

pub use config::{GraphConfig, UnknownNeighbor};
pub use ids::IdGenerator;
pub use network::{LocationGraph, MAX_EDGE_DISTANCE};
pub use types::{Edge, Entity, EntityKind, GraphId};
