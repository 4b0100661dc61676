//! Graph identity and edge types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Network-wide identifier shared by centers and victims.
///
/// Assigned by [`super::IdGenerator`]; monotonically increasing and never
/// reused within one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphId(pub u64);

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of entity occupies a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    Center,
    Victim,
}

/// Identity of a registered center or victim, as seen by the graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// Join key into the graph.
    pub graph_id: GraphId,
    /// Display name (`Center-<id>` or `Victim-<id>`).
    pub name: String,
    /// Free-form location label.
    pub location: String,
    pub kind: EntityKind,
}

impl Entity {
    /// Creates a new entity record.
    pub fn new(
        graph_id: GraphId,
        name: impl Into<String>,
        location: impl Into<String>,
        kind: EntityKind,
    ) -> Self {
        Self {
            graph_id,
            name: name.into(),
            location: location.into(),
            kind,
        }
    }
}

/// One direction of an undirected edge, stored in the adjacency list of
/// its source node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// The neighbor this edge leads to.
    pub to: GraphId,
    /// Non-negative travel distance.
    pub distance: f64,
}
