use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::config::CatalogConfig;

const BUNDLED_CATALOG: &str = include_str!("../../data/lenders.json");

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LenderId(pub String);

/// Closed set of institution kinds a lender can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstitutionType {
    Bank,
    #[serde(rename = "NBFC", alias = "NonBankFinance")]
    NonBankFinance,
    #[serde(rename = "International", alias = "InternationalLender")]
    InternationalLender,
}

impl InstitutionType {
    pub fn label(&self) -> &'static str {
        match self {
            InstitutionType::Bank => "Bank",
            InstitutionType::NonBankFinance => "NBFC",
            InstitutionType::InternationalLender => "International",
        }
    }
}

/// Annual interest band, serialized as a `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct RateRange {
    pub min_annual_pct: f64,
    pub max_annual_pct: f64,
}

impl RateRange {
    pub fn new(min_annual_pct: f64, max_annual_pct: f64) -> Self {
        Self {
            min_annual_pct,
            max_annual_pct,
        }
    }

    /// Representative rate used for scoring and projections.
    pub fn midpoint(&self) -> f64 {
        (self.min_annual_pct + self.max_annual_pct) / 2.0
    }
}

impl From<(f64, f64)> for RateRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<RateRange> for (f64, f64) {
    fn from(range: RateRange) -> Self {
        (range.min_annual_pct, range.max_annual_pct)
    }
}

/// Static lender record. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LenderOffer {
    pub id: LenderId,
    pub name: String,
    #[serde(alias = "type")]
    pub institution_type: InstitutionType,
    pub rate_range: RateRange,
    pub processing_fee_flat: f64,
    /// Fraction of the loan amount, `0.01` meaning 1%.
    pub processing_fee_pct: f64,
    pub requires_collateral: bool,
    pub allows_cosigner: bool,
    pub approval_days: u32,
    pub moratorium_months: u32,
    #[serde(alias = "maxLoanInINR")]
    pub max_loan_amount: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl LenderOffer {
    pub fn midpoint_rate(&self) -> f64 {
        self.rate_range.midpoint()
    }

    pub fn accommodates(&self, loan_amount: f64) -> bool {
        loan_amount <= self.max_loan_amount
    }
}

/// Error raised while loading or validating the lender catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read lender catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lender catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid lender catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("lender '{lender_id}' is malformed: {reason}")]
    InvalidLender { lender_id: String, reason: String },
    #[error("lender id '{0}' appears more than once")]
    DuplicateId(String),
}

/// Ordered, read-only collection of lenders shared across evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct LenderCatalog {
    lenders: Vec<LenderOffer>,
}

impl LenderCatalog {
    /// Catalog compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn from_lenders(lenders: Vec<LenderOffer>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for lender in &lenders {
            validate_lender(lender)?;
            if !seen.insert(lender.id.0.as_str()) {
                return Err(CatalogError::DuplicateId(lender.id.0.clone()));
            }
        }

        Ok(Self { lenders })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let lenders: Vec<LenderOffer> = serde_json::from_str(raw)?;
        Self::from_lenders(lenders)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let lenders: Vec<LenderOffer> = serde_json::from_reader(reader)?;
        Self::from_lenders(lenders)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut lenders = Vec::new();
        for row in csv_reader.deserialize::<CsvLenderRow>() {
            lenders.push(row?.into_offer());
        }

        Self::from_lenders(lenders)
    }

    /// Loads a catalog file, choosing the CSV parser for `.csv` files and JSON otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv_reader(file)
        } else {
            Self::from_json_reader(file)
        }
    }

    pub fn lenders(&self) -> &[LenderOffer] {
        &self.lenders
    }

    pub fn get(&self, id: &LenderId) -> Option<&LenderOffer> {
        self.lenders.iter().find(|lender| &lender.id == id)
    }

    pub fn len(&self) -> usize {
        self.lenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lenders.is_empty()
    }
}

/// Resolves the configured catalog source.
pub fn load_catalog(config: &CatalogConfig) -> Result<LenderCatalog, CatalogError> {
    let catalog = match &config.path {
        Some(path) => LenderCatalog::from_path(path)?,
        None => LenderCatalog::bundled()?,
    };

    let source = config
        .path
        .as_deref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "bundled".to_string());
    info!(lenders = catalog.len(), %source, "lender catalog loaded");

    Ok(catalog)
}

fn validate_lender(lender: &LenderOffer) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidLender {
        lender_id: lender.id.0.clone(),
        reason: reason.to_string(),
    };

    if lender.id.0.trim().is_empty() {
        return Err(invalid("id must not be empty"));
    }
    if lender.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }

    let RateRange {
        min_annual_pct,
        max_annual_pct,
    } = lender.rate_range;
    if !min_annual_pct.is_finite() || !max_annual_pct.is_finite() {
        return Err(invalid("rate range must be numeric"));
    }
    if min_annual_pct < 0.0 || min_annual_pct > max_annual_pct {
        return Err(invalid("rate range must satisfy 0 <= min <= max"));
    }

    if !lender.processing_fee_flat.is_finite() || lender.processing_fee_flat < 0.0 {
        return Err(invalid("flat processing fee must be a non-negative amount"));
    }
    if !(0.0..=1.0).contains(&lender.processing_fee_pct) {
        return Err(invalid("processing fee fraction must be within [0, 1]"));
    }
    if !lender.max_loan_amount.is_finite() || lender.max_loan_amount <= 0.0 {
        return Err(invalid("maximum loan amount must be positive"));
    }

    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvLenderRow {
    id: String,
    name: String,
    institution_type: InstitutionType,
    rate_min: f64,
    rate_max: f64,
    processing_fee_flat: f64,
    processing_fee_pct: f64,
    requires_collateral: bool,
    allows_cosigner: bool,
    approval_days: u32,
    moratorium_months: u32,
    max_loan_amount: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl CsvLenderRow {
    fn into_offer(self) -> LenderOffer {
        let notes = self
            .notes
            .map(|raw| {
                raw.split('|')
                    .map(str::trim)
                    .filter(|note| !note.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        LenderOffer {
            id: LenderId(self.id),
            name: self.name,
            institution_type: self.institution_type,
            rate_range: RateRange::new(self.rate_min, self.rate_max),
            processing_fee_flat: self.processing_fee_flat,
            processing_fee_pct: self.processing_fee_pct,
            requires_collateral: self.requires_collateral,
            allows_cosigner: self.allows_cosigner,
            approval_days: self.approval_days,
            moratorium_months: self.moratorium_months,
            max_loan_amount: self.max_loan_amount,
            notes,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
