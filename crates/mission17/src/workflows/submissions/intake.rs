use std::sync::Arc;

use tracing::{debug, error, warn};

use super::audit::AuditSink;
use super::domain::SubmissionDraft;
use super::spot_check::{DrawSource, ReviewDecision, SpotCheckPolicy};

/// Pipeline stage that stamps a draft with the spot-check outcome.
///
/// The gate never rejects a draft. Missing or non-numeric confidence, random source faults,
/// and audit sink failures all leave the pipeline running.
pub struct IntakeGate {
    policy: SpotCheckPolicy,
    draws: Arc<dyn DrawSource>,
    audit: Arc<dyn AuditSink>,
}

impl IntakeGate {
    pub fn new(
        policy: SpotCheckPolicy,
        draws: Arc<dyn DrawSource>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            policy,
            draws,
            audit,
        }
    }

    pub fn policy(&self) -> &SpotCheckPolicy {
        &self.policy
    }

    /// Annotate the draft in place, returning the decision when one was made.
    pub fn annotate(&self, draft: &mut SubmissionDraft) -> Option<ReviewDecision> {
        let confidence = match draft.numeric_confidence() {
            Some(value) => value,
            None => {
                debug!(
                    mission_id = %draft.mission_id,
                    "no numeric confidence supplied; spot check skipped"
                );
                return None;
            }
        };

        let verdict = match self.policy.try_evaluate(confidence, self.draws.as_ref()) {
            Ok(verdict) => verdict,
            Err(err) => {
                error!(
                    mission_id = %draft.mission_id,
                    confidence,
                    error = %err,
                    "spot check failed; submission continues without a decision"
                );
                return None;
            }
        };

        if let Some(event) = &verdict.audit {
            if let Err(err) = self.audit.record(event) {
                warn!(
                    mission_id = %draft.mission_id,
                    confidence,
                    error = %err,
                    "failed to record spot-check audit event"
                );
            }
        }

        draft.status = Some(verdict.decision.into());
        Some(verdict.decision)
    }
}
