use metrics_exporter_prometheus::PrometheusHandle;
use mission17::config::AppConfig;
use mission17::workflows::submissions::{
    IntakeGate, LedgerError, PointsLedger, RepositoryError, SpotCheckPolicy, SubmissionId,
    SubmissionRecord, SubmissionRepository, SubmissionService, SubmissionStatus, ThreadRngDraws,
    TracingAuditSink,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn update_if_status(
        &self,
        record: SubmissionRecord,
        expected: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(&record.id) {
            Some(current) if current.status != expected => Ok(false),
            Some(_) => {
                guard.insert(record.id.clone(), record);
                Ok(true)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    fn awaiting_review(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status.awaiting_review())
            .cloned()
            .collect())
    }
}

/// Stand-in for the award contract when no relayer key is configured.
#[derive(Default)]
pub(crate) struct DevPointsLedger {
    sequence: AtomicU64,
}

impl PointsLedger for DevPointsLedger {
    fn award(&self, address: &str, points: u64) -> Result<String, LedgerError> {
        if address.trim().is_empty() {
            return Err(LedgerError::Transport("empty recipient address".to_string()));
        }
        let nonce = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("0xDEV_MODE_{nonce:08x}_{points}"))
    }
}

pub(crate) type GateService = SubmissionService<InMemorySubmissionRepository, DevPointsLedger>;

pub(crate) fn build_submission_service(config: &AppConfig) -> GateService {
    let gate = IntakeGate::new(
        SpotCheckPolicy::new(config.spot_check),
        Arc::new(ThreadRngDraws),
        Arc::new(TracingAuditSink),
    );
    SubmissionService::new(
        gate,
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(DevPointsLedger::default()),
        config.rewards,
    )
}
