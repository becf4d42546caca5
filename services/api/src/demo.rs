use crate::infra::{parse_amount, parse_percent, InMemoryLeadRepository, LoggingNotifier};
use clap::Args;
use loan_match::config::AppConfig;
use loan_match::error::AppError;
use loan_match::intake::{
    DocumentCheck, DocumentKind, LeadRepository, WaitlistService, WaitlistSubmission,
};
use loan_match::matching::{
    format_inr, format_percent, load_catalog, total_interest_over_term, AmountInput,
    BorrowerSubmission, LenderCatalog, MatchReport, MatchReportView, MatchRequest,
    MatchingEngine, ParameterOverrides, SortCriterion,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Requested principal in rupees (grouping such as 20,00,000 is accepted)
    #[arg(long, value_parser = parse_amount)]
    pub(crate) loan_amount: f64,
    /// Borrower can pledge collateral
    #[arg(long)]
    pub(crate) collateral: bool,
    /// Borrower has a co-signer
    #[arg(long)]
    pub(crate) cosigner: bool,
    /// University shown alongside the results
    #[arg(long)]
    pub(crate) university: Option<String>,
    /// Admission intake (Feb or Jul)
    #[arg(long)]
    pub(crate) intake: Option<String>,
    /// Forex margin as a percentage of principal (defaults to 1.5)
    #[arg(long = "forex-margin-pct", value_parser = parse_percent)]
    pub(crate) forex_margin: Option<f64>,
    /// Months of study before repayment starts (defaults to 18)
    #[arg(long)]
    pub(crate) study_months: Option<u32>,
    /// Repayment term used for the EMI (defaults to 84)
    #[arg(long)]
    pub(crate) repayment_months: Option<u32>,
    /// best-match, lowest-rate or fastest-approval
    #[arg(long, value_parser = parse_sort)]
    pub(crate) sort: Option<SortCriterion>,
    /// Load lenders from a JSON or CSV file instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct LendersArgs {
    /// Load lenders from a JSON or CSV file instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Principal used for the matching walkthrough (defaults to 20,00,000)
    #[arg(long, value_parser = parse_amount)]
    pub(crate) loan_amount: Option<f64>,
    /// Skip the waitlist and document checklist portion of the demo.
    #[arg(long)]
    pub(crate) skip_intake: bool,
}

fn parse_sort(raw: &str) -> Result<SortCriterion, String> {
    raw.parse()
}

fn resolve_catalog(override_path: Option<PathBuf>) -> Result<LenderCatalog, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = override_path {
        config.catalog.path = Some(path);
    }
    Ok(load_catalog(&config.catalog)?)
}

impl MatchArgs {
    fn into_request(self) -> (MatchRequest, Option<PathBuf>, bool) {
        let request = MatchRequest {
            borrower: BorrowerSubmission {
                university: self.university,
                loan_amount: Some(AmountInput::Number(self.loan_amount)),
                has_collateral: self.collateral,
                has_cosigner: self.cosigner,
                intake: self.intake,
                ..BorrowerSubmission::default()
            },
            parameters: ParameterOverrides {
                forex_margin_pct: self.forex_margin,
                study_duration_months: self.study_months,
                repayment_term_months: self.repayment_months,
                sort_criterion: self.sort,
            },
        };
        (request, self.catalog, self.json)
    }
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let (request, catalog, as_json) = args.into_request();
    let engine = MatchingEngine::new(resolve_catalog(catalog)?);
    let report = engine.evaluate_request(request)?;

    if as_json {
        match serde_json::to_string_pretty(&MatchReportView::from(&report)) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        render_match_report(&report);
    }
    Ok(())
}

pub(crate) fn run_lenders(args: LendersArgs) -> Result<(), AppError> {
    let catalog = resolve_catalog(args.catalog)?;
    render_catalog(&catalog);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let loan_amount = args.loan_amount.unwrap_or(2_000_000.0);
    let engine = MatchingEngine::new(resolve_catalog(None)?);

    println!("Student loan matcher demo");
    println!(
        "Borrower: no collateral, co-signer available, requesting {}",
        format_inr(loan_amount)
    );

    let request = MatchRequest {
        borrower: BorrowerSubmission {
            full_name: Some("Demo Borrower".to_string()),
            university: Some("University of Edinburgh".to_string()),
            loan_amount: Some(AmountInput::Number(loan_amount)),
            has_cosigner: true,
            intake: Some("Jul".to_string()),
            ..BorrowerSubmission::default()
        },
        parameters: ParameterOverrides::default(),
    };
    let report = engine.evaluate_request(request)?;
    render_match_report(&report);

    if args.skip_intake {
        return Ok(());
    }

    println!("\nWaitlist sign-up");
    let repository = Arc::new(InMemoryLeadRepository::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let waitlist = WaitlistService::new(repository.clone(), notifier.clone());
    let submission = WaitlistSubmission {
        email: "demo.borrower@example.com".to_string(),
        hardest_part: Some("Comparing total cost across lenders".to_string()),
        from_country: Some("India".to_string()),
        study_country: Some("United Kingdom".to_string()),
        university: Some("University of Edinburgh".to_string()),
        other_reason: None,
    };
    match waitlist.submit(submission.clone()) {
        Ok(record) => {
            let view = record.status_view();
            println!("  Lead {} is {}", view.lead_id.0, view.status);
        }
        Err(err) => println!("  Sign-up rejected: {err}"),
    }
    match waitlist.submit(submission) {
        Ok(_) => println!("  Duplicate sign-up unexpectedly accepted"),
        Err(err) => println!("  Second sign-up with the same e-mail: {err}"),
    }
    match repository.recent(10) {
        Ok(records) => println!("  Leads stored: {}", records.len()),
        Err(err) => println!("  Lead store unavailable: {err}"),
    }
    for notification in notifier.sent() {
        println!(
            "  Notification '{}' queued for lead {}",
            notification.template, notification.lead_id.0
        );
    }

    println!("\nDocument checklist");
    let uploaded = [
        DocumentKind::Passport,
        DocumentKind::AdmissionLetter,
        DocumentKind::BankStatements,
        DocumentKind::StatementOfPurpose,
    ];
    let check = DocumentCheck::evaluate(&uploaded);
    println!(
        "  Uploaded {} of {} documents",
        check.uploaded_count,
        DocumentKind::ALL.len()
    );
    match &check.message {
        Some(message) => println!("  {message}"),
        None => println!("  All required documents received"),
    }

    Ok(())
}

fn render_match_report(report: &MatchReport<'_>) {
    let view = MatchReportView::from(report);
    println!(
        "\n{} eligible of {} lenders for {} (sorted by {})",
        view.eligible_count, view.lenders_considered, view.loan_amount_label, view.sort_label
    );

    if report.is_empty() {
        println!("No lender's ceiling covers this amount. Try a smaller loan.");
        return;
    }

    println!("\nTop matches");
    for (position, offer) in view.top_matches.iter().enumerate() {
        println!(
            "  {}. {} ({}) score {:.1}, {} likelihood",
            position + 1,
            offer.name,
            offer.institution_type,
            offer.suitability_score,
            offer.likelihood_label
        );
    }

    let term = report.parameters.repayment_term_months;
    println!("\nAll offers");
    for (offer, scored) in view.offers.iter().zip(&report.offers) {
        let interest = total_interest_over_term(
            report.profile.loan_amount,
            scored.midpoint_rate,
            term,
        );
        println!(
            "  {:<28} rate {:<7} fee {:<10} EMI {:<10} total {:<12} collateral {:<12} approval {} days",
            offer.name,
            offer.rate_label,
            offer.processing_fee_label,
            offer.estimated_monthly_installment_label,
            offer.total_estimated_cost_label,
            offer.collateral_label,
            offer.approval_days
        );
        println!(
            "  {:<28} interest over {} months: {}",
            "",
            term,
            format_inr(interest)
        );
    }
}

fn render_catalog(catalog: &LenderCatalog) {
    println!("{} lenders in catalog", catalog.len());
    for lender in catalog.lenders() {
        println!(
            "  {:<24} {:<14} {} - {:<8} up to {:<14} approval {} days{}",
            lender.id.0,
            lender.institution_type.label(),
            format_percent(lender.rate_range.min_annual_pct),
            format_percent(lender.rate_range.max_annual_pct),
            format_inr(lender.max_loan_amount),
            lender.approval_days,
            if lender.requires_collateral {
                ", collateral required"
            } else {
                ""
            }
        );
    }
}
