//! Relief center records.

use crate::graph::GraphId;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resource category name → quantity (tonnes).
pub type ResourceMap = BTreeMap<String, f64>;

/// Operator-assigned center identifier. Orders the [`super::CenterIndex`].
///
/// Distinct from [`GraphId`]: a center ID may equal some victim's ID, and
/// neither is ever used to look up a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CenterId(pub u32);

impl fmt::Display for CenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A relief center and its current stock.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Center {
    /// Node in the location graph.
    pub graph_id: GraphId,
    /// Ordering key in the center index.
    pub center_id: CenterId,
    pub location: String,
    pub resources: ResourceMap,
}

impl Center {
    /// Creates a center record.
    pub fn new(
        graph_id: GraphId,
        center_id: CenterId,
        location: impl Into<String>,
        resources: ResourceMap,
    ) -> Self {
        Self {
            graph_id,
            center_id,
            location: location.into(),
            resources,
        }
    }

    /// Display name, derived from the center ID.
    pub fn name(&self) -> String {
        format!("Center-{}", self.center_id)
    }

    /// Number of distinct resource categories held.
    pub fn category_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if the center holds fewer than `min_categories`
    /// categories.
    pub fn is_under_provisioned(&self, min_categories: usize) -> bool {
        self.category_count() < min_categories
    }

    /// Current stock of a category, if the center carries it.
    pub fn stock(&self, category: &str) -> Option<f64> {
        self.resources.get(category).copied()
    }

    /// Returns `true` if every requested category is stocked in at least the
    /// requested quantity. Partial coverage does not count.
    pub fn can_satisfy(&self, request: &ResourceMap) -> bool {
        request
            .iter()
            .all(|(category, &qty)| self.stock(category).is_some_and(|have| have >= qty))
    }

    /// Subtracts every requested quantity from stock.
    ///
    /// # Panics
    ///
    /// Panics if a category is missing or would go negative. Callers must
    /// check [`can_satisfy`](Self::can_satisfy) first, under the same
    /// exclusive borrow.
    pub fn debit(&mut self, request: &ResourceMap) {
        for (category, &qty) in request {
            let stock = self
                .resources
                .get_mut(category)
                .unwrap_or_else(|| panic!("center {} has no '{category}' to debit", self.center_id));
            let remaining = *stock - qty;
            assert!(
                remaining >= 0.0,
                "center {} stock of '{category}' would go negative ({remaining})",
                self.center_id
            );
            *stock = remaining;
        }
    }
}
