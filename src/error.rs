//! Error type shared by every component.

use crate::centers::CenterId;
use crate::graph::GraphId;
use thiserror::Error;

/// Recoverable failures reported by the relief network.
///
/// None of these are fatal. Dispatch outcomes that are part of normal
/// operation (nothing pending, nobody eligible) are reported through
/// [`crate::dispatching::DispatchOutcome`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReliefError {
    #[error("no relief center with id {0}")]
    CenterNotFound(CenterId),

    #[error("no node with graph id {0} in the network")]
    NodeNotFound(GraphId),

    #[error("no pending victim requests")]
    EmptyQueue,

    #[error("the network has no nodes yet")]
    EmptyNetwork,

    #[error("no relief center can satisfy the request")]
    Ineligible,

    #[error("edge {from} -> {to} references an unregistered node")]
    InvalidEdge { from: GraphId, to: GraphId },

    #[error("invalid distance {distance} on edge {from} -> {to}")]
    InvalidDistance {
        from: GraphId,
        to: GraphId,
        distance: f64,
    },

    #[error("invalid quantity {quantity} for resource '{category}'")]
    InvalidQuantity { category: String, quantity: f64 },

    #[error("priority {0} is outside 1..=5")]
    InvalidPriority(u8),

    #[error("a relief center needs at least {required} resource categories, got {found}")]
    TooFewCategories { required: usize, found: usize },
}
