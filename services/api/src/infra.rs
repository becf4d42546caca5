use loan_match::intake::{
    sort_newest_first, LeadId, LeadNotification, LeadNotifier, LeadRecord, LeadRepository,
    NotifyError, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("lead store lock poisoned".to_string()))
}

/// Process-local lead store keyed by id; e-mail addresses are unique.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<BTreeMap<LeadId, LeadRecord>>>,
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let duplicate = guard.contains_key(&record.lead.lead_id)
            || guard
                .values()
                .any(|existing| existing.lead.email == record.lead.email);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&record.lead.lead_id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut records: Vec<LeadRecord> = guard.values().cloned().collect();
        sort_newest_first(&mut records);
        records.truncate(limit);
        Ok(records)
    }
}

/// Records welcome e-mails instead of sending them.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    outbox: Arc<Mutex<Vec<LeadNotification>>>,
}

impl LeadNotifier for LoggingNotifier {
    fn notify(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        info!(
            template = %notification.template,
            lead_id = %notification.lead_id.0,
            "queued lead notification"
        );
        self.outbox
            .lock()
            .map_err(|_| NotifyError::Transport("outbox lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn sent(&self) -> Vec<LeadNotification> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

/// Parses a percentage such as `1.5` or `1.5%` into a fraction of principal.
pub(crate) fn parse_percent(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a percentage ({err})"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("percentage '{raw}' must be zero or positive"));
    }
    Ok(value / 100.0)
}

/// Parses a rupee amount, accepting Indian or Western digit grouping.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("amount '{raw}' must be positive"));
    }
    Ok(value)
}
