//! Investability scoring.
//!
//! Turns a [`ProfileSnapshot`] into a 0-100 score with four explanatory reasons
//! (identity, accounts, documents, revenue, always in that order).
//!
//! Rounding: half away from zero (`f64::round`) for both the displayed revenue
//! contribution and the final score. The first three terms are integers and the
//! revenue term is non-negative, so the two always agree.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};

/// Points for a completed identity verification.
pub const IDENTITY_POINTS: u32 = 30;
/// Points for a linked financial-data connection.
pub const ACCOUNTS_POINTS: u32 = 20;
/// Points once the document threshold is reached.
pub const DOCUMENTS_POINTS: u32 = 25;
/// Documents needed for [`DOCUMENTS_POINTS`].
pub const DOCUMENT_THRESHOLD: u64 = 3;
/// Upper bound of the revenue contribution.
pub const REVENUE_POINTS_CAP: f64 = 25.0;
/// Revenue at which the contribution reaches the cap.
pub const REVENUE_FOR_CAP: f64 = 1_000_000.0;

/// Read-only view of a profile's verification, financial and document state.
///
/// Built fresh for every scoring request and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    identity_verified: bool,
    accounts_linked: bool,
    document_count: u64,
    annual_revenue: f64,
}

impl ProfileSnapshot {
    /// Builds a snapshot, rejecting negative or non-finite revenue.
    pub fn new(
        identity_verified: bool,
        accounts_linked: bool,
        document_count: u64,
        annual_revenue: f64,
    ) -> Result<Self, AppError> {
        if !annual_revenue.is_finite() || annual_revenue < 0.0 {
            return Err(AppError::BadRequest(format!(
                "Annual revenue must be a non-negative number, got {}",
                annual_revenue
            )));
        }

        Ok(Self {
            identity_verified,
            accounts_linked,
            document_count,
            annual_revenue,
        })
    }

    /// Builds a snapshot from a raw database count, rejecting negative counts.
    pub fn from_counts(
        identity_verified: bool,
        accounts_linked: bool,
        document_count: i64,
        annual_revenue: f64,
    ) -> Result<Self, AppError> {
        let document_count = u64::try_from(document_count).map_err(|_| {
            AppError::InternalError(format!(
                "Document count must be non-negative, got {}",
                document_count
            ))
        })?;
        Self::new(identity_verified, accounts_linked, document_count, annual_revenue)
    }

    pub fn identity_verified(&self) -> bool {
        self.identity_verified
    }

    pub fn accounts_linked(&self) -> bool {
        self.accounts_linked
    }

    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    pub fn annual_revenue(&self) -> f64 {
        self.annual_revenue
    }
}

/// Score plus the reasons behind it, serialized verbatim by `GET /api/score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32,
    pub reasons: Vec<String>,
}

/// Unrounded revenue contribution, linear up to [`REVENUE_FOR_CAP`] and capped after.
pub fn revenue_contribution(annual_revenue: f64) -> f64 {
    // Multiply first so whole-dollar revenues land on exact half points.
    (annual_revenue * REVENUE_POINTS_CAP / REVENUE_FOR_CAP).min(REVENUE_POINTS_CAP)
}

/// Computes the investability score for a snapshot.
pub fn score_profile(snapshot: &ProfileSnapshot) -> ScoreReport {
    let mut points: u32 = 0;
    let mut reasons = Vec::with_capacity(4);

    if snapshot.identity_verified {
        points += IDENTITY_POINTS;
        reasons.push("KYC verified - Strong foundation for investor trust".to_string());
    } else {
        reasons.push("Complete KYC verification to build investor confidence".to_string());
    }

    if snapshot.accounts_linked {
        points += ACCOUNTS_POINTS;
        reasons.push("Financials linked - Transparency is key for investors".to_string());
    } else {
        reasons.push("Link financials to demonstrate fiscal responsibility".to_string());
    }

    if snapshot.document_count >= DOCUMENT_THRESHOLD {
        points += DOCUMENTS_POINTS;
        reasons.push(format!(
            "{} documents uploaded - Comprehensive due diligence package",
            snapshot.document_count
        ));
    } else {
        let missing = DOCUMENT_THRESHOLD - snapshot.document_count;
        let noun = if missing == 1 { "document" } else { "documents" };
        reasons.push(format!(
            "Upload {} more {} for complete investor package",
            missing, noun
        ));
    }

    let revenue_score = revenue_contribution(snapshot.annual_revenue);
    reasons.push(format!(
        "Revenue performance: ${} (Score: {}/25)",
        format_currency(snapshot.annual_revenue),
        revenue_score.round() as u32
    ));

    let score = (f64::from(points) + revenue_score).round() as u32;

    ScoreReport { score, reasons }
}

/// Formats an amount with thousands separators, showing cents only when present.
pub fn format_currency(amount: f64) -> String {
    let cents_total = (amount * 100.0).round() as u128;
    let dollars = cents_total / 100;
    let cents = cents_total % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if cents == 0 {
        grouped
    } else {
        format!("{}.{:02}", grouped, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(identity: bool, accounts: bool, docs: u64, revenue: f64) -> ProfileSnapshot {
        ProfileSnapshot::new(identity, accounts, docs, revenue).unwrap()
    }

    #[test]
    fn test_maximal_snapshot_scores_100() {
        let report = score_profile(&snapshot(true, true, 3, 1_000_000.0));
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_minimal_snapshot_scores_0() {
        let report = score_profile(&snapshot(false, false, 0, 0.0));
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_default_snapshot_is_minimal() {
        let report = score_profile(&ProfileSnapshot::default());
        assert_eq!(report.score, 0);
        assert_eq!(report.reasons.len(), 4);
    }

    #[test]
    fn test_revenue_contribution_boundaries() {
        assert_eq!(revenue_contribution(0.0), 0.0);
        assert_eq!(revenue_contribution(1_000_000.0), 25.0);
        assert_eq!(revenue_contribution(10_000_000.0), 25.0);
        assert_eq!(revenue_contribution(500_000.0), 12.5);
    }

    #[test]
    fn test_revenue_cap_holds_in_score() {
        let at_cap = score_profile(&snapshot(false, false, 0, 1_000_000.0));
        let beyond = score_profile(&snapshot(false, false, 0, 10_000_000.0));
        assert_eq!(at_cap.score, 25);
        assert_eq!(beyond.score, 25);
        assert!(beyond.reasons[3].ends_with("(Score: 25/25)"));
    }

    #[test]
    fn test_half_points_round_away_from_zero() {
        // 500k -> 12.5 points, 20k -> 0.5 points
        let report = score_profile(&snapshot(true, false, 0, 500_000.0));
        assert_eq!(report.score, 43);
        assert_eq!(
            report.reasons[3],
            "Revenue performance: $500,000 (Score: 13/25)"
        );

        let report = score_profile(&snapshot(false, false, 0, 20_000.0));
        assert_eq!(report.score, 1);
        assert_eq!(report.reasons[3], "Revenue performance: $20,000 (Score: 1/25)");
    }

    #[test]
    fn test_displayed_contribution_matches_score() {
        for revenue in [0.0, 19_999.0, 20_000.0, 333_333.0, 740_000.0, 999_999.0] {
            let report = score_profile(&snapshot(true, true, 5, revenue));
            let shown = revenue_contribution(revenue).round() as u32;
            assert_eq!(report.score, 75 + shown, "revenue {}", revenue);
        }
    }

    #[test]
    fn test_document_reasons() {
        let two = score_profile(&snapshot(false, false, 2, 0.0));
        assert_eq!(
            two.reasons[2],
            "Upload 1 more document for complete investor package"
        );
        assert_eq!(two.score, 0);

        let three = score_profile(&snapshot(false, false, 3, 0.0));
        assert_eq!(
            three.reasons[2],
            "3 documents uploaded - Comprehensive due diligence package"
        );
        assert_eq!(three.score, 25);

        let none = score_profile(&snapshot(false, false, 0, 0.0));
        assert_eq!(
            none.reasons[2],
            "Upload 3 more documents for complete investor package"
        );
    }

    #[test]
    fn test_reason_order() {
        let report = score_profile(&snapshot(true, false, 4, 1_250.5));
        assert_eq!(report.reasons.len(), 4);
        assert!(report.reasons[0].starts_with("KYC verified"));
        assert!(report.reasons[1].starts_with("Link financials"));
        assert!(report.reasons[2].starts_with("4 documents uploaded"));
        assert_eq!(
            report.reasons[3],
            "Revenue performance: $1,250.50 (Score: 0/25)"
        );
    }

    #[test]
    fn test_rejects_invalid_revenue() {
        assert!(ProfileSnapshot::new(false, false, 0, -1.0).is_err());
        assert!(ProfileSnapshot::new(false, false, 0, f64::NAN).is_err());
        assert!(ProfileSnapshot::new(false, false, 0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_negative_document_count() {
        assert!(ProfileSnapshot::from_counts(false, false, -1, 0.0).is_err());
        let ok = ProfileSnapshot::from_counts(true, true, 7, 10.0).unwrap();
        assert_eq!(ok.document_count(), 7);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "0");
        assert_eq!(format_currency(999.0), "999");
        assert_eq!(format_currency(1_000.0), "1,000");
        assert_eq!(format_currency(1_234_567.0), "1,234,567");
        assert_eq!(format_currency(12.3), "12.30");
    }

    #[test]
    fn test_report_json_shape() {
        let report = score_profile(&snapshot(true, true, 3, 1_000_000.0));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["score"], 100);
        assert_eq!(value["reasons"].as_array().unwrap().len(), 4);
    }
}
