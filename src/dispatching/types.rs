//! Dispatch results.

use crate::centers::{CenterId, ResourceMap};
use crate::error::ReliefError;
use crate::graph::GraphId;
use crate::requests::VictimId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A committed transfer from one center to one victim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dispatch {
    pub center_id: CenterId,
    pub center_graph_id: GraphId,
    pub victim_id: VictimId,
    pub victim_graph_id: GraphId,
    /// Shortest travel distance between the two.
    pub distance: f64,
    /// Quantities taken from the center.
    pub debited: ResourceMap,
    /// The center's full stock after the debit.
    pub remaining: ResourceMap,
}

/// Result of one dispatch attempt.
///
/// Every variant is an ordinary outcome. In all but `NoPendingRequests` the
/// head request has been consumed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DispatchOutcome {
    /// The request was served.
    Dispatched(Dispatch),

    /// The queue was empty; nothing changed.
    NoPendingRequests,

    /// No reachable center could cover the whole request. The request was
    /// dropped.
    NoEligibleCenter { victim_id: VictimId },
}

impl DispatchOutcome {
    /// Returns `true` if a transfer was committed.
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched(_))
    }

    /// The committed transfer, if any.
    pub fn dispatch(&self) -> Option<&Dispatch> {
        match self {
            DispatchOutcome::Dispatched(d) => Some(d),
            _ => None,
        }
    }

    /// Converts non-dispatch outcomes into errors, for callers that treat
    /// them as failures.
    pub fn into_result(self) -> Result<Dispatch, ReliefError> {
        match self {
            DispatchOutcome::Dispatched(d) => Ok(d),
            DispatchOutcome::NoPendingRequests => Err(ReliefError::EmptyQueue),
            DispatchOutcome::NoEligibleCenter { .. } => Err(ReliefError::Ineligible),
        }
    }
}
