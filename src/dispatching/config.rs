//! Dispatch configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`super::DispatchEngine`].
///
/// # Examples
///
/// ```
/// use u_relief::dispatching::DispatchConfig;
///
/// let config = DispatchConfig::default()
///     .with_epsilon(1e-6)
///     .with_parallel(true);
/// assert_eq!(config.epsilon, 1e-6);
/// assert!(config.parallel);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DispatchConfig {
    /// Two candidate distances closer than this count as tied.
    ///
    /// `0.0` (the default) ties only exactly equal distances. Negative and
    /// NaN values are treated as `0.0`.
    pub epsilon: f64,

    /// Whether to compute candidate distances in parallel using rayon.
    ///
    /// The winner is the same either way.
    pub parallel: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.0,
            parallel: false,
        }
    }
}

impl DispatchConfig {
    /// Sets the distance tie tolerance.
    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps.max(0.0);
        self
    }

    /// Enables or disables parallel distance evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
