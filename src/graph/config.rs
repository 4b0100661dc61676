//! Location graph configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when an edge names a neighbor that has no adjacency entry yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnknownNeighbor {
    /// Create an empty adjacency entry for the neighbor so it can be
    /// registered later.
    #[default]
    Placeholder,

    /// Refuse the edge with [`crate::ReliefError::InvalidEdge`].
    Reject,
}

/// Configuration for [`super::LocationGraph`].
///
/// # Examples
///
/// ```
/// use u_relief::graph::{GraphConfig, UnknownNeighbor};
///
/// let config = GraphConfig::default().with_unknown_neighbor(UnknownNeighbor::Reject);
/// assert_eq!(config.unknown_neighbor, UnknownNeighbor::Reject);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphConfig {
    /// Policy for edges to nodes that are not in the graph yet.
    pub unknown_neighbor: UnknownNeighbor,
}

impl GraphConfig {
    /// Sets the unknown-neighbor policy.
    pub fn with_unknown_neighbor(mut self, policy: UnknownNeighbor) -> Self {
        self.unknown_neighbor = policy;
        self
    }
}
