use super::common::*;
use crate::intake::domain::{
    normalize_email, LeadId, LeadValidationError, WaitlistSubmission, MAX_ANSWER_CHARS,
};

#[test]
fn email_must_be_present_and_structurally_valid() {
    assert_eq!(normalize_email("   "), Err(LeadValidationError::MissingEmail));
    for raw in [
        "plainaddress",
        "@example.com",
        "name@",
        "name@localhost",
        "name@example..com",
        "name@.example.com",
        "two words@example.com",
        "a@b@example.com",
    ] {
        assert_eq!(
            normalize_email(raw),
            Err(LeadValidationError::InvalidEmail(raw.to_string())),
            "{raw} should be rejected"
        );
    }
    assert_eq!(
        normalize_email(" Student@Uni.Example.AC.in "),
        Ok("student@uni.example.ac.in".to_string())
    );
}

#[test]
fn blank_answers_are_dropped() {
    let form = WaitlistSubmission {
        email: "lead@example.com".to_string(),
        hardest_part: Some("   ".to_string()),
        other_reason: Some(" visa timing ".to_string()),
        ..WaitlistSubmission::default()
    };

    let lead = form
        .into_lead(LeadId("lead-1".to_string()), received_at())
        .expect("valid lead");
    assert_eq!(lead.hardest_part, None);
    assert_eq!(lead.other_reason.as_deref(), Some("visa timing"));
    assert_eq!(lead.university, None);
}

#[test]
fn oversized_answers_are_rejected() {
    let form = WaitlistSubmission {
        email: "lead@example.com".to_string(),
        other_reason: Some("x".repeat(MAX_ANSWER_CHARS + 1)),
        ..WaitlistSubmission::default()
    };

    assert_eq!(
        form.into_lead(LeadId("lead-1".to_string()), received_at()),
        Err(LeadValidationError::AnswerTooLong {
            field: "otherReason",
            max: MAX_ANSWER_CHARS,
        })
    );
}

#[test]
fn submission_reads_landing_page_field_names() {
    let form: WaitlistSubmission = serde_json::from_str(
        r#"{"email":"a@b.co","hardestPart":"Paperwork","fromCountry":"India","studyCountry":"Germany"}"#,
    )
    .expect("json parses");
    assert_eq!(form.hardest_part.as_deref(), Some("Paperwork"));
    assert_eq!(form.study_country.as_deref(), Some("Germany"));
    assert_eq!(form.university, None);
}
