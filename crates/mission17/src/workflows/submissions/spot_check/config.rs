use serde::{Deserialize, Serialize};

/// Policy constants for the high-confidence spot check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotCheckConfig {
    /// Scores strictly above this percentage are eligible for sampling.
    pub high_confidence_threshold: f64,
    /// Probability that an eligible submission is diverted to an administrator.
    pub spot_check_rate: f64,
}

impl Default for SpotCheckConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: 90.0,
            spot_check_rate: 0.05,
        }
    }
}
