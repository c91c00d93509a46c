use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::submissions::audit::{AuditError, AuditSink};
use crate::workflows::submissions::domain::{SubmissionDraft, SubmissionId, SubmissionStatus};
use crate::workflows::submissions::repository::{
    LedgerError, PointsLedger, RepositoryError, SubmissionRecord, SubmissionRepository,
};
use crate::workflows::submissions::spot_check::{
    AuditEvent, DrawError, DrawSource, SpotCheckConfig, SpotCheckPolicy,
};
use crate::workflows::submissions::{IntakeGate, RewardConfig, SubmissionService};

pub(super) const WALLET: &str = "0x9fB29AAc15b9A4B7F17c3385939b007540f4d791";

/// Returns the same sample on every call and counts how often it was asked.
pub(super) struct FixedDraw {
    value: f64,
    calls: AtomicUsize,
}

impl FixedDraw {
    pub(super) fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DrawSource for FixedDraw {
    fn draw(&self) -> Result<f64, DrawError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value)
    }
}

pub(super) struct FailingDraws;

impl DrawSource for FailingDraws {
    fn draw(&self) -> Result<f64, DrawError> {
        Err(DrawError::Unavailable("entropy pool exhausted".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    lines: Mutex<Vec<String>>,
}

impl MemoryAudit {
    pub(super) fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        self.lines
            .lock()
            .expect("audit mutex poisoned")
            .push(event.message());
        Ok(())
    }
}

pub(super) struct BrokenAudit;

impl AuditSink for BrokenAudit {
    fn record(&self, _event: &AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Unavailable("log shipper down".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for MemoryRepository {
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
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn update_if_status(
        &self,
        record: SubmissionRecord,
        expected: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get(&record.id) {
            Some(current) if current.status == expected => {
                guard.insert(record.id.clone(), record);
                Ok(true)
            }
            Some(_) => Ok(false),
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

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SubmissionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_if_status(
        &self,
        _record: SubmissionRecord,
        _expected: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _user_id: &str) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn awaiting_review(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// In-memory store whose writes fail while `failing_writes` is above zero.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    failing_writes: AtomicUsize,
}

impl FlakyRepository {
    pub(super) fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    fn write_fails(&self) -> bool {
        self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }
}

impl SubmissionRepository for FlakyRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), RepositoryError> {
        if self.write_fails() {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.update(record)
    }

    fn update_if_status(
        &self,
        record: SubmissionRecord,
        expected: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        if self.write_fails() {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.update_if_status(record, expected)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.inner.for_user(user_id)
    }

    fn awaiting_review(&self) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        self.inner.awaiting_review()
    }
}

#[derive(Default)]
pub(super) struct MemoryLedger {
    awards: Mutex<Vec<(String, u64)>>,
}

impl MemoryLedger {
    pub(super) fn awards(&self) -> Vec<(String, u64)> {
        self.awards.lock().expect("ledger mutex poisoned").clone()
    }
}

impl PointsLedger for MemoryLedger {
    fn award(&self, address: &str, points: u64) -> Result<String, LedgerError> {
        let mut guard = self.awards.lock().expect("ledger mutex poisoned");
        guard.push((address.to_string(), points));
        Ok(format!("0xtx{:04}", guard.len()))
    }
}

pub(super) struct OfflineLedger;

impl PointsLedger for OfflineLedger {
    fn award(&self, _address: &str, _points: u64) -> Result<String, LedgerError> {
        Err(LedgerError::Transport("rpc timeout".to_string()))
    }
}

pub(super) fn draft(confidence: Option<Value>) -> SubmissionDraft {
    SubmissionDraft {
        user_id: "user-42".to_string(),
        username: Some("ana".to_string()),
        mission_id: "sdg-13-tree-planting".to_string(),
        mission_title: "Plant a Tree".to_string(),
        image_uri: Some("https://cdn.mission17.app/proofs/tree.jpg".to_string()),
        wallet_address: Some(WALLET.to_string()),
        confidence,
        status: None,
    }
}

pub(super) fn scored_draft(confidence: f64) -> SubmissionDraft {
    draft(Some(json!(confidence)))
}

pub(super) fn gate_with(draws: Arc<dyn DrawSource>, audit: Arc<dyn AuditSink>) -> IntakeGate {
    IntakeGate::new(SpotCheckPolicy::new(SpotCheckConfig::default()), draws, audit)
}

pub(super) fn build_service(
    draw: f64,
) -> (
    SubmissionService<MemoryRepository, MemoryLedger>,
    Arc<MemoryRepository>,
    Arc<MemoryLedger>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let ledger = Arc::new(MemoryLedger::default());
    let gate = gate_with(
        Arc::new(FixedDraw::new(draw)),
        Arc::new(MemoryAudit::default()),
    );
    let service = SubmissionService::new(
        gate,
        repository.clone(),
        ledger.clone(),
        RewardConfig::default(),
    );
    (service, repository, ledger)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
