//! Lead intake around the matcher: waitlist sign-ups with a welcome e-mail hook, and the
//! application document checklist.

pub mod documents;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use documents::{
    missing_documents_message, missing_required, DocumentCheck, DocumentCheckRequest,
    DocumentKind,
};
pub use domain::{
    normalize_email, LeadId, LeadStatus, LeadValidationError, WaitlistLead, WaitlistSubmission,
    MAX_ANSWER_CHARS,
};
pub use repository::{
    sort_newest_first, LeadNotification, LeadNotifier, LeadRecord, LeadRepository,
    LeadStatusView, NotifyError, RepositoryError,
};
pub use router::intake_router;
pub use service::{LeadServiceError, WaitlistService, WELCOME_TEMPLATE};
