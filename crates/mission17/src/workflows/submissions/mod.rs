//! Mission submission intake, the human-in-the-loop spot check, and admin decisions.

pub mod audit;
pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod spot_check;

#[cfg(test)]
mod tests;

pub use audit::{AuditError, AuditSink, TracingAuditSink};
pub use domain::{SubmissionDraft, SubmissionId, SubmissionStatus};
pub use intake::IntakeGate;
pub use repository::{
    LedgerError, PointsLedger, RepositoryError, SubmissionRecord, SubmissionRepository,
    SubmissionStatusView,
};
pub use router::{submission_router, RejectRequest};
pub use service::{RewardConfig, SubmissionService, SubmissionServiceError};
pub use spot_check::{
    AuditEvent, DrawError, DrawSource, ReviewDecision, SpotCheckConfig, SpotCheckPolicy,
    SpotCheckVerdict, ThreadRngDraws,
};
