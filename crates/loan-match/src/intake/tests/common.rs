use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::intake::domain::{LeadId, WaitlistSubmission};
use crate::intake::repository::{
    sort_newest_first, LeadNotification, LeadNotifier, LeadRecord, LeadRepository, NotifyError,
    RepositoryError,
};
use crate::intake::{intake_router, WaitlistService};

pub(super) fn received_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn submission(email: &str) -> WaitlistSubmission {
    WaitlistSubmission {
        email: email.to_string(),
        hardest_part: Some("Finding a lender without collateral".to_string()),
        from_country: Some("India".to_string()),
        study_country: Some("Canada".to_string()),
        university: Some("University of Waterloo".to_string()),
        other_reason: None,
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<LeadId, LeadRecord>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl LeadRepository for MemoryRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.lead.email == record.lead.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.lead.lead_id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LeadRecord> = guard.values().cloned().collect();
        sort_newest_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    sent: Mutex<Vec<LeadNotification>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<LeadNotification> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl LeadNotifier for MemoryNotifier {
    fn notify(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl LeadNotifier for OfflineNotifier {
    fn notify(&self, _notification: LeadNotification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay offline".to_string()))
    }
}

/// Accepts inserts but cannot rewrite a stored lead.
#[derive(Default)]
pub(super) struct InsertOnlyRepository {
    inner: MemoryRepository,
}

impl LeadRepository for InsertOnlyRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("sheet is read-only".to_string()))
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        self.inner.recent(limit)
    }
}

pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("sheet offline".to_string()))
    }
}

pub(super) fn service() -> (
    Arc<WaitlistService<MemoryRepository, MemoryNotifier>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = Arc::new(WaitlistService::new(repository.clone(), notifier.clone()));
    (service, repository, notifier)
}

pub(super) fn router() -> axum::Router {
    let (service, _, _) = service();
    intake_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
