//! Application document checklist used before a lender hand-off.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Passport,
    AdmissionLetter,
    BankStatements,
    ProofOfIncome,
    CosignerDocuments,
    AcademicTranscripts,
    ProofOfAddress,
    RecommendationLetters,
    StatementOfPurpose,
    VisaDocuments,
}

impl DocumentKind {
    /// Checklist order shown to borrowers.
    pub const ALL: [DocumentKind; 10] = [
        DocumentKind::Passport,
        DocumentKind::AdmissionLetter,
        DocumentKind::BankStatements,
        DocumentKind::ProofOfIncome,
        DocumentKind::CosignerDocuments,
        DocumentKind::AcademicTranscripts,
        DocumentKind::ProofOfAddress,
        DocumentKind::RecommendationLetters,
        DocumentKind::StatementOfPurpose,
        DocumentKind::VisaDocuments,
    ];

    pub fn is_required(&self) -> bool {
        !matches!(
            self,
            DocumentKind::RecommendationLetters
                | DocumentKind::StatementOfPurpose
                | DocumentKind::VisaDocuments
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Passport => "Passport",
            DocumentKind::AdmissionLetter => "Admission Letter",
            DocumentKind::BankStatements => "Bank Statements",
            DocumentKind::ProofOfIncome => "Proof of Income",
            DocumentKind::CosignerDocuments => "Co-signer Documents",
            DocumentKind::AcademicTranscripts => "Academic Transcripts",
            DocumentKind::ProofOfAddress => "Proof of Address",
            DocumentKind::RecommendationLetters => "Recommendation Letters",
            DocumentKind::StatementOfPurpose => "Statement of Purpose",
            DocumentKind::VisaDocuments => "Visa Documents",
        }
    }
}

/// Required documents absent from `uploaded`, in checklist order.
pub fn missing_required(uploaded: &[DocumentKind]) -> Vec<DocumentKind> {
    DocumentKind::ALL
        .into_iter()
        .filter(|kind| kind.is_required() && !uploaded.contains(kind))
        .collect()
}

/// Borrower-facing prompt listing what is still missing, or `None` once complete.
pub fn missing_documents_message(missing: &[DocumentKind]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }

    let labels: Vec<&str> = missing.iter().map(DocumentKind::label).collect();
    Some(format!(
        "Please upload the following required documents: {}",
        labels.join(", ")
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCheckRequest {
    #[serde(default)]
    pub uploaded: Vec<DocumentKind>,
}

/// Checklist outcome for one set of uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentCheck {
    pub complete: bool,
    pub uploaded_count: usize,
    pub missing_required: Vec<DocumentKind>,
    pub missing_optional: Vec<DocumentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DocumentCheck {
    pub fn evaluate(uploaded: &[DocumentKind]) -> Self {
        let missing_required = missing_required(uploaded);
        let missing_optional = DocumentKind::ALL
            .into_iter()
            .filter(|kind| !kind.is_required() && !uploaded.contains(kind))
            .collect();
        let uploaded_count = DocumentKind::ALL
            .iter()
            .filter(|kind| uploaded.contains(kind))
            .count();

        Self {
            complete: missing_required.is_empty(),
            uploaded_count,
            message: missing_documents_message(&missing_required),
            missing_required,
            missing_optional,
        }
    }
}
