/// Property-based tests for the matching engine
/// Invariants that must hold for any catalog and borrower
use std::num::NonZeroU32;

use loan_match::intake::normalize_email;
use loan_match::matching::{
    evaluate, filter_eligible, monthly_installment, processing_fee, rank, score, score_offer,
    BorrowerProfile, EvaluationParameters, InstitutionType, LenderId, LenderOffer, RateRange,
    SortCriterion,
};
use proptest::prelude::*;

fn lender_strategy() -> impl Strategy<Value = LenderOffer> {
    (
        0.0f64..20.0,
        0.0f64..5.0,
        0.0f64..50_000.0,
        0.0f64..0.05,
        any::<bool>(),
        any::<bool>(),
        0u32..30,
        0u32..24,
        1_000.0f64..50_000_000.0,
    )
        .prop_map(
            |(min, spread, flat, pct, collateral, cosigner, days, moratorium, ceiling)| {
                LenderOffer {
                    id: LenderId(String::new()),
                    name: "Generated Lender".to_string(),
                    institution_type: InstitutionType::NonBankFinance,
                    rate_range: RateRange::new(min, min + spread),
                    processing_fee_flat: flat,
                    processing_fee_pct: pct,
                    requires_collateral: collateral,
                    allows_cosigner: cosigner,
                    approval_days: days,
                    moratorium_months: moratorium,
                    max_loan_amount: ceiling,
                    notes: Vec::new(),
                }
            },
        )
}

fn catalog_strategy() -> impl Strategy<Value = Vec<LenderOffer>> {
    prop::collection::vec(lender_strategy(), 0..12).prop_map(|mut lenders| {
        for (index, lender) in lenders.iter_mut().enumerate() {
            lender.id = LenderId(format!("lender-{index}"));
        }
        lenders
    })
}

fn profile_strategy() -> impl Strategy<Value = BorrowerProfile> {
    (1.0f64..60_000_000.0, any::<bool>(), any::<bool>()).prop_map(
        |(amount, collateral, cosigner)| {
            BorrowerProfile::new(amount, collateral, cosigner).expect("positive amount")
        },
    )
}

fn sort_strategy() -> impl Strategy<Value = SortCriterion> {
    prop_oneof![
        Just(SortCriterion::BestMatch),
        Just(SortCriterion::LowestRate),
        Just(SortCriterion::FastestApproval),
    ]
}

// Property: eligibility is exactly the ceiling test, in catalog order
proptest! {
    #[test]
    fn filter_keeps_exactly_accommodating_lenders(
        lenders in catalog_strategy(),
        amount in 1.0f64..60_000_000.0
    ) {
        let eligible = filter_eligible(&lenders, amount);
        prop_assert!(eligible.iter().all(|lender| amount <= lender.max_loan_amount));
        let expected: Vec<&LenderOffer> = lenders
            .iter()
            .filter(|lender| amount <= lender.max_loan_amount)
            .collect();
        prop_assert_eq!(eligible, expected);
    }

    #[test]
    fn evaluation_is_deterministic(
        lenders in catalog_strategy(),
        profile in profile_strategy(),
        sort in sort_strategy()
    ) {
        let params = EvaluationParameters::default().with_sort(sort);
        let first = evaluate(&lenders, &profile, &params);
        let second = evaluate(&lenders, &profile, &params);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sort_choice_never_changes_membership_or_top_matches(
        lenders in catalog_strategy(),
        profile in profile_strategy(),
        sort in sort_strategy()
    ) {
        let best = evaluate(&lenders, &profile, &EvaluationParameters::default());
        let sorted = evaluate(
            &lenders,
            &profile,
            &EvaluationParameters::default().with_sort(sort),
        );

        let mut best_ids: Vec<&str> = best.offers.iter().map(|o| o.lender.id.0.as_str()).collect();
        let mut sorted_ids: Vec<&str> =
            sorted.offers.iter().map(|o| o.lender.id.0.as_str()).collect();
        best_ids.sort_unstable();
        sorted_ids.sort_unstable();
        prop_assert_eq!(best_ids, sorted_ids);
        prop_assert_eq!(best.top_matches, sorted.top_matches);
    }
}

// Property: ranking is stable and ordered
proptest! {
    #[test]
    fn best_match_ranking_is_non_increasing_and_stable(
        lenders in catalog_strategy(),
        profile in profile_strategy()
    ) {
        let params = EvaluationParameters::default();
        let scored: Vec<_> = lenders
            .iter()
            .map(|lender| score_offer(lender, &profile, &params))
            .collect();
        let ranked = rank(&scored, SortCriterion::BestMatch);

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].suitability_score >= pair[1].suitability_score);
            if pair[0].suitability_score == pair[1].suitability_score {
                let position = |id: &LenderId| lenders.iter().position(|l| &l.id == id);
                prop_assert!(position(&pair[0].lender.id) < position(&pair[1].lender.id));
            }
        }
    }

    #[test]
    fn lower_midpoint_rate_never_scores_lower(
        lender in lender_strategy(),
        profile in profile_strategy(),
        cut in 0.0f64..5.0
    ) {
        let mut cheaper = lender.clone();
        let floor = (lender.rate_range.min_annual_pct - cut).max(0.0);
        cheaper.rate_range = RateRange::new(floor, lender.rate_range.max_annual_pct - cut);
        prop_assume!(cheaper.rate_range.max_annual_pct >= floor);
        prop_assume!(cheaper.midpoint_rate() <= lender.midpoint_rate());

        prop_assert!(score(&cheaper, &profile) >= score(&lender, &profile));
    }

    #[test]
    fn processing_fee_respects_both_floors(
        lender in lender_strategy(),
        amount in 1.0f64..60_000_000.0
    ) {
        let fee = processing_fee(&lender, amount);
        prop_assert!(fee >= lender.processing_fee_flat);
        prop_assert!(fee >= amount * lender.processing_fee_pct);
    }
}

// Property: installment edge behaviour
proptest! {
    #[test]
    fn zero_rate_installment_divides_principal(
        principal in 1.0f64..60_000_000.0,
        months in 1u32..480
    ) {
        let term = NonZeroU32::new(months).expect("non-zero");
        let emi = monthly_installment(principal, 0.0, term);
        prop_assert!((emi - principal / f64::from(months)).abs() < 1e-9 * principal.max(1.0));
    }

    #[test]
    fn positive_rate_installment_exceeds_straight_division(
        principal in 1_000.0f64..60_000_000.0,
        rate in 0.5f64..20.0,
        months in 1u32..480
    ) {
        let term = NonZeroU32::new(months).expect("non-zero");
        let emi = monthly_installment(principal, rate, term);
        prop_assert!(emi.is_finite());
        prop_assert!(emi > principal / f64::from(months));
    }
}

// Property: e-mail normalisation never panics
proptest! {
    #[test]
    fn email_normalisation_never_panics(raw in "\\PC*") {
        let _ = normalize_email(&raw);
    }

    #[test]
    fn simple_addresses_normalise_to_lowercase(
        local in "[A-Za-z]{1,10}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}"
    ) {
        let email = format!("{local}@{domain}.{tld}");
        prop_assert_eq!(normalize_email(&email), Ok(email.to_ascii_lowercase()));
    }
}
