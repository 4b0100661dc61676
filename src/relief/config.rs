//! Relief network configuration.

use crate::dispatching::DispatchConfig;
use crate::graph::GraphConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`super::ReliefNetwork`].
///
/// # Examples
///
/// ```
/// use u_relief::relief::ReliefConfig;
/// use u_relief::dispatching::DispatchConfig;
///
/// let config = ReliefConfig::default()
///     .with_min_categories(4)
///     .with_dispatch(DispatchConfig::default().with_parallel(true));
/// assert_eq!(config.min_categories, 4);
/// assert!(config.dispatch.parallel);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReliefConfig {
    /// Minimum distinct resource categories for a center to qualify.
    ///
    /// Validated registration refuses centers below this; the audit lists
    /// indexed centers that have fallen below it.
    pub min_categories: usize,

    /// Location graph settings.
    pub graph: GraphConfig,

    /// Dispatch engine settings.
    pub dispatch: DispatchConfig,
}

impl Default for ReliefConfig {
    fn default() -> Self {
        Self {
            min_categories: 3,
            graph: GraphConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl ReliefConfig {
    /// Sets the minimum number of resource categories.
    pub fn with_min_categories(mut self, n: usize) -> Self {
        self.min_categories = n;
        self
    }

    /// Sets the location graph configuration.
    pub fn with_graph(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    /// Sets the dispatch configuration.
    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }
}
