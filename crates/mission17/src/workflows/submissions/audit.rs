use super::spot_check::AuditEvent;

/// Destination for spot-check audit records.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Writes each audit record as a single `warn` line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        tracing::warn!(
            confidence = event.confidence,
            threshold = event.threshold,
            spot_check_rate = event.spot_check_rate,
            "{}",
            event.message()
        );
        Ok(())
    }
}
