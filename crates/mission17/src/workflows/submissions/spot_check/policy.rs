use super::config::SpotCheckConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the spot check for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approved,
    #[serde(rename = "Pending Admin Review")]
    PendingAdminReview,
}

impl ReviewDecision {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReviewDecision::Approved => "Approved",
            ReviewDecision::PendingAdminReview => "Pending Admin Review",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of a submission diverted to manual review. Emitted by the caller, not the policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub confidence: f64,
    pub threshold: f64,
    pub spot_check_rate: f64,
    pub draw: f64,
}

impl AuditEvent {
    /// Operator-facing line; log processors key on the percentage and the word "review".
    pub fn message(&self) -> String {
        format!(
            "HITL triggered: high confidence ({}%) mission flagged for review.",
            self.confidence
        )
    }
}

/// Decision plus the optional audit record produced alongside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotCheckVerdict {
    pub decision: ReviewDecision,
    pub audit: Option<AuditEvent>,
}

impl SpotCheckVerdict {
    pub(crate) const fn approved() -> Self {
        Self {
            decision: ReviewDecision::Approved,
            audit: None,
        }
    }

    pub fn requires_review(&self) -> bool {
        self.decision == ReviewDecision::PendingAdminReview
    }
}

pub(crate) fn is_eligible(confidence: f64, config: &SpotCheckConfig) -> bool {
    // NaN compares false and stays approved.
    confidence > config.high_confidence_threshold
}

pub(crate) fn decide_verdict(
    confidence: f64,
    draw: f64,
    config: &SpotCheckConfig,
) -> SpotCheckVerdict {
    if draw < config.spot_check_rate {
        SpotCheckVerdict {
            decision: ReviewDecision::PendingAdminReview,
            audit: Some(AuditEvent {
                confidence,
                threshold: config.high_confidence_threshold,
                spot_check_rate: config.spot_check_rate,
                draw,
            }),
        }
    } else {
        SpotCheckVerdict::approved()
    }
}
