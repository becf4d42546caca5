use std::sync::{Arc, Mutex};

use loan_match::intake::{
    DocumentCheck, DocumentKind, LeadId, LeadNotification, LeadNotifier, LeadRecord,
    LeadRepository, LeadServiceError, LeadStatus, NotifyError, RepositoryError,
    WaitlistService, WaitlistSubmission,
};

#[derive(Default)]
struct SheetRepository {
    rows: Mutex<Vec<LeadRecord>>,
}

impl LeadRepository for SheetRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut rows = self.rows.lock().expect("sheet mutex poisoned");
        if rows.iter().any(|row| row.lead.email == record.lead.email) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("sheet mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.lead.lead_id == record.lead.lead_id)
            .ok_or(RepositoryError::NotFound)?;
        *row = record;
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("sheet mutex poisoned");
        Ok(rows.iter().find(|row| &row.lead.lead_id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("sheet mutex poisoned");
        Ok(rows.iter().rev().take(limit).cloned().collect())
    }
}

#[derive(Default)]
struct Outbox {
    messages: Mutex<Vec<LeadNotification>>,
}

impl LeadNotifier for Outbox {
    fn notify(&self, notification: LeadNotification) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .expect("outbox mutex poisoned")
            .push(notification);
        Ok(())
    }
}

#[test]
fn sign_up_then_document_check() {
    let repository = Arc::new(SheetRepository::default());
    let outbox = Arc::new(Outbox::default());
    let service = WaitlistService::new(repository.clone(), outbox.clone());

    let record = service
        .submit(WaitlistSubmission {
            email: "meera@example.org".to_string(),
            hardest_part: Some("Comparing lenders".to_string()),
            from_country: Some("India".to_string()),
            study_country: Some("Australia".to_string()),
            university: Some("University of Melbourne".to_string()),
            other_reason: None,
        })
        .expect("sign-up accepted");

    assert_eq!(record.status, LeadStatus::Welcomed);
    assert_eq!(record.status_view().status, "welcomed");
    assert_eq!(
        outbox.messages.lock().expect("outbox mutex poisoned").len(),
        1
    );

    let duplicate = service.submit(WaitlistSubmission {
        email: "Meera@Example.org".to_string(),
        ..WaitlistSubmission::default()
    });
    assert!(matches!(
        duplicate,
        Err(LeadServiceError::Repository(RepositoryError::Conflict))
    ));

    let recent = service.recent(10).expect("recent leads");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].lead.lead_id, record.lead.lead_id);

    let check = DocumentCheck::evaluate(&[
        DocumentKind::Passport,
        DocumentKind::AdmissionLetter,
        DocumentKind::BankStatements,
        DocumentKind::ProofOfIncome,
        DocumentKind::CosignerDocuments,
        DocumentKind::AcademicTranscripts,
    ]);
    assert!(!check.complete);
    assert_eq!(check.missing_required, vec![DocumentKind::ProofOfAddress]);
    assert_eq!(
        check.message.as_deref(),
        Some("Please upload the following required documents: Proof of Address")
    );
}
