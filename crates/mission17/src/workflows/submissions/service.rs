use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{SubmissionDraft, SubmissionId, SubmissionStatus};
use super::intake::IntakeGate;
use super::repository::{PointsLedger, RepositoryError, SubmissionRecord, SubmissionRepository};

/// Points credited for every approved mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub mission_points: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            mission_points: 100,
        }
    }
}

/// Service composing the intake gate, repository, and points ledger.
pub struct SubmissionService<R, L> {
    gate: Arc<IntakeGate>,
    repository: Arc<R>,
    ledger: Arc<L>,
    rewards: RewardConfig,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

impl<R, L> SubmissionService<R, L>
where
    R: SubmissionRepository + 'static,
    L: PointsLedger + 'static,
{
    pub fn new(
        gate: IntakeGate,
        repository: Arc<R>,
        ledger: Arc<L>,
        rewards: RewardConfig,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            repository,
            ledger,
            rewards,
        }
    }

    pub fn gate(&self) -> &IntakeGate {
        &self.gate
    }

    /// Run a new submission through the spot check and persist it.
    pub fn submit(
        &self,
        mut draft: SubmissionDraft,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        validate_draft(&draft)?;

        self.gate.annotate(&mut draft);

        let record = SubmissionRecord {
            id: next_submission_id(),
            user_id: draft.user_id,
            username: draft.username,
            mission_id: draft.mission_id,
            mission_title: draft.mission_title,
            image_uri: draft.image_uri,
            wallet_address: draft.wallet_address,
            status: draft.status.unwrap_or(SubmissionStatus::Pending),
            rejection_reason: None,
            transaction_hash: None,
            created_at: Utc::now(),
        };

        let mut stored = self.repository.insert(record)?;
        info!(
            submission_id = %stored.id.0,
            user_id = %stored.user_id,
            mission = %stored.mission_title,
            status = stored.status.label(),
            "mission submission received"
        );

        if stored.status == SubmissionStatus::Approved {
            self.credit(&mut stored);
        }

        Ok(stored)
    }

    /// Administrator approval of a submission still awaiting review.
    ///
    /// The status change is persisted before the ledger is called, so a failed write or a
    /// concurrent decision never results in an award.
    pub fn approve(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionServiceError> {
        let mut record = self.awaiting_decision(id)?;
        let expected = record.status;
        record.status = SubmissionStatus::Approved;
        self.transition(&record, expected)?;

        info!(submission_id = %id.0, user_id = %record.user_id, "submission approved by admin");
        self.credit(&mut record);
        Ok(record)
    }

    /// Administrator rejection of a submission still awaiting review.
    pub fn reject(
        &self,
        id: &SubmissionId,
        reason: Option<String>,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let mut record = self.awaiting_decision(id)?;
        let expected = record.status;
        let reason = reason
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "No reason provided".to_string());

        record.status = SubmissionStatus::Rejected;
        record.rejection_reason = Some(reason);
        self.transition(&record, expected)?;

        info!(
            submission_id = %id.0,
            reason = record.rejection_reason.as_deref().unwrap_or_default(),
            "submission rejected by admin"
        );
        Ok(record)
    }

    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Submission history for a user, newest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<SubmissionRecord>, SubmissionServiceError> {
        let mut records = self.repository.for_user(user_id)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(records)
    }

    /// Submissions an administrator still has to decide on, oldest first.
    pub fn review_queue(&self) -> Result<Vec<SubmissionRecord>, SubmissionServiceError> {
        let mut records = self.repository.awaiting_review()?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(records)
    }

    fn awaiting_decision(
        &self,
        id: &SubmissionId,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self.get(id)?;
        if !record.status.awaiting_review() {
            return Err(SubmissionServiceError::InvalidTransition {
                id: id.clone(),
                status: record.status,
            });
        }
        Ok(record)
    }

    /// Persist a decided record, refusing when its status moved on since it was read.
    fn transition(
        &self,
        record: &SubmissionRecord,
        expected: SubmissionStatus,
    ) -> Result<(), SubmissionServiceError> {
        if self.repository.update_if_status(record.clone(), expected)? {
            return Ok(());
        }
        let current = self.get(&record.id)?;
        Err(SubmissionServiceError::InvalidTransition {
            id: record.id.clone(),
            status: current.status,
        })
    }

    /// Award points for a record already stored as approved. Ledger problems and a failed
    /// hash write never fail the caller; the record is returned as stored.
    fn credit(&self, record: &mut SubmissionRecord) {
        let Some(address) = record.wallet_address.as_deref() else {
            warn!(
                submission_id = %record.id.0,
                user_id = %record.user_id,
                "approved submission has no wallet address; points not recorded on ledger"
            );
            return;
        };

        let hash = match self.ledger.award(address, self.rewards.mission_points) {
            Ok(hash) => hash,
            Err(err) => {
                warn!(
                    submission_id = %record.id.0,
                    error = %err,
                    "points award failed"
                );
                return;
            }
        };
        info!(
            submission_id = %record.id.0,
            points = self.rewards.mission_points,
            transaction_hash = %hash,
            "points awarded"
        );

        let mut credited = record.clone();
        credited.transaction_hash = Some(hash);
        match self.repository.update(credited.clone()) {
            Ok(()) => *record = credited,
            Err(err) => warn!(
                submission_id = %record.id.0,
                transaction_hash = credited.transaction_hash.as_deref().unwrap_or_default(),
                error = %err,
                "points awarded but transaction hash could not be stored"
            ),
        }
    }
}

fn validate_draft(draft: &SubmissionDraft) -> Result<(), SubmissionServiceError> {
    let required = [
        ("user_id", draft.user_id.as_str()),
        ("mission_id", draft.mission_id.as_str()),
        ("mission_title", draft.mission_title.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(SubmissionServiceError::Invalid(format!("{field} is required")));
        }
    }
    Ok(())
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error("invalid submission: {0}")]
    Invalid(String),
    #[error("submission {} is {} and can no longer be decided", .id.0, .status.label())]
    InvalidTransition {
        id: SubmissionId,
        status: SubmissionStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
