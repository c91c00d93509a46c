use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{SubmissionId, SubmissionStatus};

/// Repository record for a mission submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub user_id: String,
    pub username: Option<String>,
    pub mission_id: String,
    pub mission_title: String,
    pub image_uri: Option<String>,
    pub wallet_address: Option<String>,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
    pub transaction_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn status_message(&self) -> String {
        match self.status {
            SubmissionStatus::Pending => "mission submitted for review".to_string(),
            SubmissionStatus::PendingAdminReview => {
                "mission selected for manual review by an administrator".to_string()
            }
            SubmissionStatus::Approved => match &self.transaction_hash {
                Some(hash) => format!("mission approved; points recorded in {hash}"),
                None => "mission approved".to_string(),
            },
            SubmissionStatus::Rejected => format!(
                "mission rejected: {}",
                self.rejection_reason.as_deref().unwrap_or("no reason provided")
            ),
        }
    }

    pub fn status_view(&self) -> SubmissionStatusView {
        SubmissionStatusView {
            submission_id: self.id.clone(),
            mission_id: self.mission_id.clone(),
            status: self.status.label(),
            message: self.status_message(),
            transaction_hash: self.transaction_hash.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError>;
    /// Replace the stored record only while its status is still `expected`.
    ///
    /// Returns `Ok(false)` when another decision got there first; nothing is written then.
    fn update_if_status(
        &self,
        record: SubmissionRecord,
        expected: SubmissionStatus,
    ) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn for_user(&self, user_id: &str) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn awaiting_review(&self) -> Result<Vec<SubmissionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound points relay (the blockchain award contract in production).
pub trait PointsLedger: Send + Sync {
    /// Award `points` to `address`, returning the transaction hash.
    fn award(&self, address: &str, points: u64) -> Result<String, LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger credentials are not configured")]
    Misconfigured,
    #[error("ledger transport failed: {0}")]
    Transport(String),
}

/// Sanitized representation of a submission's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStatusView {
    pub submission_id: SubmissionId,
    pub mission_id: String,
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}
