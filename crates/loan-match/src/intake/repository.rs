use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{LeadId, LeadStatus, WaitlistLead};

/// Stored waitlist entry with its welcome status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead: WaitlistLead,
    pub status: LeadStatus,
}

impl LeadRecord {
    pub fn status_view(&self) -> LeadStatusView {
        LeadStatusView {
            lead_id: self.lead.lead_id.clone(),
            status: self.status.label(),
            created_at: self.lead.created_at,
        }
    }
}

/// Storage abstraction so the waitlist service can run without a spreadsheet or database.
pub trait LeadRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the e-mail is already on the waitlist.
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    /// Most recent leads first.
    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError>;
}

/// Orders records newest first: by creation time, then by id sequence.
///
/// String order of ids breaks once the sequence outgrows its zero padding.
pub fn sort_newest_first(records: &mut [LeadRecord]) {
    records.sort_by(|a, b| {
        b.lead
            .created_at
            .cmp(&a.lead.created_at)
            .then_with(|| b.lead.lead_id.sequence().cmp(&a.lead.lead_id.sequence()))
            .then_with(|| b.lead.lead_id.cmp(&a.lead.lead_id))
    });
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead already exists")]
    Conflict,
    #[error("lead not found")]
    NotFound,
    #[error("lead store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound e-mail hook fired for every accepted lead.
pub trait LeadNotifier: Send + Sync {
    fn notify(&self, notification: LeadNotification) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadNotification {
    pub template: String,
    pub lead_id: LeadId,
    pub recipient: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Public view of a lead; the e-mail address is never echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}
