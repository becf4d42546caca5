use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{LeadId, LeadStatus, LeadValidationError, WaitlistLead, WaitlistSubmission};
use super::repository::{
    LeadNotification, LeadNotifier, LeadRecord, LeadRepository, RepositoryError,
};

pub const WELCOME_TEMPLATE: &str = "waitlist_welcome";

/// Accepts waitlist sign-ups, stores them and sends the welcome e-mail.
pub struct WaitlistService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    sequence: AtomicU64,
}

impl<R, N> WaitlistService<R, N>
where
    R: LeadRepository + 'static,
    N: LeadNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_lead_id(&self) -> LeadId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        LeadId::from_sequence(id)
    }

    pub fn submit(&self, submission: WaitlistSubmission) -> Result<LeadRecord, LeadServiceError> {
        self.submit_at(submission, Utc::now())
    }

    /// Validates and stores a sign-up stamped with `received_at`.
    ///
    /// A failed welcome e-mail, or a failed status update after it, leaves the lead stored
    /// with [`LeadStatus::Received`]; the sign-up itself still succeeds.
    pub fn submit_at(
        &self,
        submission: WaitlistSubmission,
        received_at: DateTime<Utc>,
    ) -> Result<LeadRecord, LeadServiceError> {
        let lead = submission.into_lead(self.next_lead_id(), received_at)?;
        let mut record = self.repository.insert(LeadRecord {
            lead,
            status: LeadStatus::Received,
        })?;
        info!(lead_id = %record.lead.lead_id.0, "waitlist lead stored");

        match self.notifier.notify(welcome_notification(&record.lead)) {
            Ok(()) => {
                let welcomed = LeadRecord {
                    status: LeadStatus::Welcomed,
                    ..record.clone()
                };
                match self.repository.update(welcomed.clone()) {
                    Ok(()) => record = welcomed,
                    Err(error) => {
                        warn!(
                            lead_id = %record.lead.lead_id.0,
                            %error,
                            "welcome status not saved"
                        );
                    }
                }
            }
            Err(error) => {
                warn!(lead_id = %record.lead.lead_id.0, %error, "welcome email not sent");
            }
        }

        Ok(record)
    }

    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, LeadServiceError> {
        Ok(self.repository.recent(limit)?)
    }
}

fn welcome_notification(lead: &WaitlistLead) -> LeadNotification {
    let mut details = BTreeMap::new();
    if let Some(university) = &lead.university {
        details.insert("university".to_string(), university.clone());
    }
    if let Some(country) = &lead.study_country {
        details.insert("study_country".to_string(), country.clone());
    }

    LeadNotification {
        template: WELCOME_TEMPLATE.to_string(),
        lead_id: lead.lead_id.clone(),
        recipient: lead.email.clone(),
        details,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Validation(#[from] LeadValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
