/// Property-based tests using proptest
/// Tests invariants of the investability score that should hold for all profiles
use founder_onboarding_api::scoring::{
    format_currency, revenue_contribution, score_profile, ProfileSnapshot, ACCOUNTS_POINTS,
    DOCUMENTS_POINTS, DOCUMENT_THRESHOLD, IDENTITY_POINTS, REVENUE_POINTS_CAP,
};
use founder_onboarding_api::validation::{sanitize_file_name, MAX_FILE_NAME_BYTES};
use proptest::prelude::*;

fn snapshot(kyc: bool, linked: bool, docs: u64, revenue: f64) -> ProfileSnapshot {
    ProfileSnapshot::new(kyc, linked, docs, revenue).unwrap()
}

fn whole_dollars() -> impl Strategy<Value = f64> {
    (0u64..=50_000_000u64).prop_map(|r| r as f64)
}

// Property: the score is bounded and always explained by four reasons
proptest! {
    #[test]
    fn score_is_bounded(
        kyc in proptest::bool::ANY,
        linked in proptest::bool::ANY,
        docs in 0u64..1_000,
        revenue in 0.0f64..1e12,
    ) {
        let report = score_profile(&snapshot(kyc, linked, docs, revenue));
        prop_assert!(report.score <= 100);
        prop_assert_eq!(report.reasons.len(), 4);
    }

    #[test]
    fn revenue_contribution_never_exceeds_cap(revenue in 0.0f64..1e15) {
        let contribution = revenue_contribution(revenue);
        prop_assert!(contribution >= 0.0);
        prop_assert!(contribution <= REVENUE_POINTS_CAP);
    }

    #[test]
    fn negative_revenue_is_rejected(revenue in -1e12f64..-0.01) {
        prop_assert!(ProfileSnapshot::new(false, false, 0, revenue).is_err());
    }
}

// Property: improving any single input never lowers the score
proptest! {
    #[test]
    fn verifying_identity_never_lowers_score(
        linked in proptest::bool::ANY,
        docs in 0u64..10,
        revenue in whole_dollars(),
    ) {
        let before = score_profile(&snapshot(false, linked, docs, revenue)).score;
        let after = score_profile(&snapshot(true, linked, docs, revenue)).score;
        prop_assert_eq!(after, before + IDENTITY_POINTS);
    }

    #[test]
    fn linking_accounts_never_lowers_score(
        kyc in proptest::bool::ANY,
        docs in 0u64..10,
        revenue in whole_dollars(),
    ) {
        let before = score_profile(&snapshot(kyc, false, docs, revenue)).score;
        let after = score_profile(&snapshot(kyc, true, docs, revenue)).score;
        prop_assert_eq!(after, before + ACCOUNTS_POINTS);
    }

    #[test]
    fn more_documents_never_lower_score(
        kyc in proptest::bool::ANY,
        linked in proptest::bool::ANY,
        docs in 0u64..10,
        extra in 1u64..10,
        revenue in whole_dollars(),
    ) {
        let before = score_profile(&snapshot(kyc, linked, docs, revenue)).score;
        let after = score_profile(&snapshot(kyc, linked, docs + extra, revenue)).score;
        prop_assert!(after >= before);
        if docs < DOCUMENT_THRESHOLD && docs + extra >= DOCUMENT_THRESHOLD {
            prop_assert_eq!(after, before + DOCUMENTS_POINTS);
        }
    }

    #[test]
    fn more_revenue_never_lowers_score(
        kyc in proptest::bool::ANY,
        linked in proptest::bool::ANY,
        docs in 0u64..10,
        revenue in whole_dollars(),
        extra in 0u64..5_000_000,
    ) {
        let before = score_profile(&snapshot(kyc, linked, docs, revenue)).score;
        let after = score_profile(&snapshot(kyc, linked, docs, revenue + extra as f64)).score;
        prop_assert!(after >= before);
    }
}

// Property: the revenue reason shows exactly the points the score received
proptest! {
    #[test]
    fn displayed_revenue_points_match_score(
        kyc in proptest::bool::ANY,
        linked in proptest::bool::ANY,
        docs in 0u64..10,
        revenue in whole_dollars(),
    ) {
        let report = score_profile(&snapshot(kyc, linked, docs, revenue));

        let fixed = if kyc { IDENTITY_POINTS } else { 0 }
            + if linked { ACCOUNTS_POINTS } else { 0 }
            + if docs >= DOCUMENT_THRESHOLD { DOCUMENTS_POINTS } else { 0 };
        let displayed = revenue_contribution(revenue).round() as u32;

        prop_assert_eq!(report.score, fixed + displayed);
        prop_assert_eq!(
            &report.reasons[3],
            &format!(
                "Revenue performance: ${} (Score: {}/25)",
                format_currency(revenue),
                displayed
            )
        );
    }

    #[test]
    fn missing_documents_reason_counts_down(docs in 0u64..DOCUMENT_THRESHOLD) {
        let report = score_profile(&snapshot(false, false, docs, 0.0));
        let missing = DOCUMENT_THRESHOLD - docs;
        let prefix = format!("Upload {} more document", missing);
        prop_assert!(report.reasons[2].starts_with(&prefix));
    }

    #[test]
    fn currency_formatting_keeps_digits(dollars in 0u64..10_000_000_000u64) {
        let formatted = format_currency(dollars as f64);
        let digits: String = formatted.chars().filter(|c| *c != ',').collect();
        prop_assert_eq!(digits, dollars.to_string());
    }
}

// Property: sanitized file names never carry directory components
proptest! {
    #[test]
    fn sanitize_file_name_never_panics(name in "\\PC*") {
        let _ = sanitize_file_name(&name);
    }

    #[test]
    fn sanitized_names_are_plain_components(
        dirs in proptest::collection::vec("[a-z.]{1,8}", 0..4),
        base in "[a-zA-Z0-9_-]{1,40}\\.pdf",
        windows in proptest::bool::ANY,
    ) {
        let sep = if windows { "\\" } else { "/" };
        let mut raw = dirs.join(sep);
        if !raw.is_empty() {
            raw.push_str(sep);
        }
        raw.push_str(&base);

        let cleaned = sanitize_file_name(&raw).unwrap();
        prop_assert_eq!(&cleaned, &base);
        prop_assert!(!cleaned.contains('/') && !cleaned.contains('\\'));
        prop_assert!(cleaned.len() <= MAX_FILE_NAME_BYTES);
    }
}
