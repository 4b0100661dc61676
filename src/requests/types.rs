//! Victim request records.

use crate::centers::ResourceMap;
use crate::error::ReliefError;
use crate::graph::GraphId;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operator-assigned victim identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VictimId(pub u32);

impl fmt::Display for VictimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a request, 1 (least severe) to 5 (critical).
///
/// # Examples
///
/// ```
/// use u_relief::requests::Priority;
///
/// assert_eq!(Priority::new(5).unwrap(), Priority::CRITICAL);
/// assert!(Priority::new(0).is_err());
/// assert!(Priority::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Priority(u8);

impl Priority {
    pub const LOWEST: Priority = Priority(1);
    pub const CRITICAL: Priority = Priority(5);

    /// Validates a raw severity level.
    pub fn new(level: u8) -> Result<Self, ReliefError> {
        if (Self::LOWEST.0..=Self::CRITICAL.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ReliefError::InvalidPriority(level))
        }
    }

    /// The raw severity level.
    pub fn level(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A victim and the resources they asked for.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Victim {
    pub graph_id: GraphId,
    pub victim_id: VictimId,
    pub location: String,
    pub priority: Priority,
    /// Requested quantity per resource category.
    pub request: ResourceMap,
}

impl Victim {
    /// Creates a victim record.
    pub fn new(
        graph_id: GraphId,
        victim_id: VictimId,
        location: impl Into<String>,
        priority: Priority,
        request: ResourceMap,
    ) -> Self {
        Self {
            graph_id,
            victim_id,
            location: location.into(),
            priority,
            request,
        }
    }

    /// Display name, derived from the victim ID.
    pub fn name(&self) -> String {
        format!("Victim-{}", self.victim_id)
    }
}
