use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest free-text answer kept on a lead.
pub const MAX_ANSWER_CHARS: usize = 500;

/// Identifier wrapper for waitlist leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn from_sequence(sequence: u64) -> Self {
        LeadId(format!("lead-{sequence:06}"))
    }

    /// Numeric part of a sequential id; `None` for ids minted elsewhere.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("lead-")?.parse().ok()
    }
}

/// Waitlist form as posted by the landing page. Every answer except the e-mail is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSubmission {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub hardest_part: Option<String>,
    #[serde(default)]
    pub from_country: Option<String>,
    #[serde(default)]
    pub study_country: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub other_reason: Option<String>,
}

/// Accepted waitlist entry with normalised answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistLead {
    pub lead_id: LeadId,
    pub email: String,
    pub hardest_part: Option<String>,
    pub from_country: Option<String>,
    pub study_country: Option<String>,
    pub university: Option<String>,
    pub other_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStatus {
    Received,
    Welcomed,
}

impl LeadStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Received => "received",
            LeadStatus::Welcomed => "welcomed",
        }
    }
}

/// Rejected waitlist input; nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("email is required")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("{field} must be at most {max} characters")]
    AnswerTooLong { field: &'static str, max: usize },
}

impl WaitlistSubmission {
    /// Normalises the submission into a lead, or explains why it cannot be accepted.
    pub fn into_lead(
        self,
        lead_id: LeadId,
        created_at: DateTime<Utc>,
    ) -> Result<WaitlistLead, LeadValidationError> {
        let email = normalize_email(&self.email)?;

        Ok(WaitlistLead {
            lead_id,
            email,
            hardest_part: answer("hardestPart", self.hardest_part)?,
            from_country: answer("fromCountry", self.from_country)?,
            study_country: answer("studyCountry", self.study_country)?,
            university: answer("university", self.university)?,
            other_reason: answer("otherReason", self.other_reason)?,
            created_at,
        })
    }
}

/// Trims and lower-cases an address after a structural check: one `@`, a non-empty local part
/// and a dotted domain, with no whitespace.
pub fn normalize_email(raw: &str) -> Result<String, LeadValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LeadValidationError::MissingEmail);
    }

    let invalid = || LeadValidationError::InvalidEmail(trimmed.to_string());
    if trimmed.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }

    Ok(trimmed.to_ascii_lowercase())
}

fn answer(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, LeadValidationError> {
    let Some(value) = value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
    else {
        return Ok(None);
    };

    if value.chars().count() > MAX_ANSWER_CHARS {
        return Err(LeadValidationError::AnswerTooLong {
            field,
            max: MAX_ANSWER_CHARS,
        });
    }
    Ok(Some(value))
}
