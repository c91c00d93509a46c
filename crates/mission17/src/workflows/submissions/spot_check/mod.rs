//! High-confidence spot check.
//!
//! Very confident classifier scores are the ones an adversary learns to produce, so a random
//! slice of them is routed to a human regardless of the score.

mod config;
mod draws;
mod policy;

pub use config::SpotCheckConfig;
pub use draws::{DrawError, DrawSource, ThreadRngDraws};
pub use policy::{AuditEvent, ReviewDecision, SpotCheckVerdict};

use draws::checked_draw;
use policy::{decide_verdict, is_eligible};

/// Stateless evaluator applying the spot-check configuration to a confidence score.
#[derive(Debug, Clone, Default)]
pub struct SpotCheckPolicy {
    config: SpotCheckConfig,
}

impl SpotCheckPolicy {
    pub fn new(config: SpotCheckConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpotCheckConfig {
        &self.config
    }

    /// Evaluate a score, surfacing random source faults to the caller.
    ///
    /// Scores at or below the threshold never consume a draw.
    pub fn try_evaluate(
        &self,
        confidence: f64,
        draws: &dyn DrawSource,
    ) -> Result<SpotCheckVerdict, DrawError> {
        if !is_eligible(confidence, &self.config) {
            return Ok(SpotCheckVerdict::approved());
        }

        let draw = checked_draw(draws)?;
        Ok(decide_verdict(confidence, draw, &self.config))
    }

    /// Infallible variant: a faulty random source resolves to `Approved`.
    pub fn evaluate(&self, confidence: f64, draws: &dyn DrawSource) -> SpotCheckVerdict {
        self.try_evaluate(confidence, draws)
            .unwrap_or_else(|_| SpotCheckVerdict::approved())
    }
}
