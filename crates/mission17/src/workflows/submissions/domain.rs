use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::spot_check::ReviewDecision;

/// Identifier wrapper for stored submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Inbound mission proof as posted by the mobile client.
///
/// `confidence` stays loosely typed: only JSON numbers take part in the spot check, anything
/// else is ignored. `status` is never read from the wire; the intake gate fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub mission_id: String,
    pub mission_title: String,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(skip)]
    pub status: Option<SubmissionStatus>,
}

impl SubmissionDraft {
    /// Numeric confidence, if the client supplied one.
    pub fn numeric_confidence(&self) -> Option<f64> {
        self.confidence.as_ref().and_then(Value::as_f64)
    }
}

/// Persisted lifecycle of a submission.
///
/// The serialized strings are shared with the admin dashboard and the mobile history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    #[serde(rename = "Pending Admin Review")]
    PendingAdminReview,
    Rejected,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::PendingAdminReview => "Pending Admin Review",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// Whether an administrator still has to decide on the submission.
    pub const fn awaiting_review(self) -> bool {
        matches!(
            self,
            SubmissionStatus::Pending | SubmissionStatus::PendingAdminReview
        )
    }
}

impl From<ReviewDecision> for SubmissionStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => SubmissionStatus::Approved,
            ReviewDecision::PendingAdminReview => SubmissionStatus::PendingAdminReview,
        }
    }
}
