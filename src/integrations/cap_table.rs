use crate::errors::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapTable {
    pub company: ShareSummary,
    pub shareholders: Vec<Shareholder>,
    pub summary: FundingSummary,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSummary {
    pub name: String,
    pub total_shares: u64,
    pub outstanding_shares: u64,
    pub fully_diluted_shares: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolderType {
    Founder,
    Investor,
    Pool,
    Advisor,
    Employee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shareholder {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub holder_type: HolderType,
    pub shares: u64,
    /// Percentage of fully diluted shares, two decimals.
    pub percentage: f64,
    pub share_class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vesting_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSummary {
    pub total_investors: u32,
    pub total_raised: u64,
    pub current_valuation: u64,
    pub last_round: FundingRound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingRound {
    #[serde(rename = "type")]
    pub round_type: String,
    pub amount: u64,
    pub valuation: u64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuation409a {
    pub current: CurrentValuation,
    pub history: Vec<HistoricalValuation>,
    pub next_review: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentValuation {
    pub value: u64,
    pub date: String,
    pub method: String,
    pub assumptions: ValuationAssumptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAssumptions {
    pub risk_free_rate: f64,
    pub volatility: f64,
    pub time_to_exit: f64,
    pub discount_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalValuation {
    pub value: u64,
    pub date: String,
    pub method: String,
    pub round: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClass {
    pub name: String,
    pub total_shares: u64,
    pub outstanding: u64,
    pub rights: ShareRights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<SharePreferences>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRights {
    pub voting: String,
    pub dividends: String,
    pub liquidation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePreferences {
    pub dividend: f64,
    pub liquidation: f64,
}

/// Cap-table management (Carta-shaped).
#[async_trait]
pub trait CapTableProvider: Send + Sync {
    async fn cap_table(&self) -> Result<CapTable, AppError>;

    async fn valuation_409a(&self) -> Result<Valuation409a, AppError>;

    async fn share_classes(&self) -> Result<Vec<ShareClass>, AppError>;
}

/// Serves one fixed seed-stage cap table.
#[derive(Debug, Clone, Default)]
pub struct MockCapTableProvider;

const FULLY_DILUTED_SHARES: u64 = 8_500_000;
const VESTING_4Y: &str = "4-year cliff, monthly vesting";

fn holder(id: &str, name: &str, holder_type: HolderType, shares: u64, class: &str) -> Shareholder {
    Shareholder {
        id: id.to_string(),
        name: name.to_string(),
        holder_type,
        shares,
        percentage: percentage_of(shares, FULLY_DILUTED_SHARES),
        share_class: class.to_string(),
        vesting_schedule: None,
        investment: None,
        valuation: None,
        allocated: None,
        available: None,
    }
}

/// Share of `total` as a percentage rounded to two decimals.
fn percentage_of(shares: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (shares as f64 / total as f64 * 10_000.0).round() / 100.0
}

#[async_trait]
impl CapTableProvider for MockCapTableProvider {
    async fn cap_table(&self) -> Result<CapTable, AppError> {
        let shareholders = vec![
            Shareholder {
                vesting_schedule: Some(VESTING_4Y.to_string()),
                ..holder("holder_001", "Founder A", HolderType::Founder, 3_000_000, "Common")
            },
            Shareholder {
                vesting_schedule: Some(VESTING_4Y.to_string()),
                ..holder("holder_002", "Founder B", HolderType::Founder, 2_500_000, "Common")
            },
            Shareholder {
                investment: Some(500_000),
                valuation: Some(3_000_000),
                ..holder(
                    "holder_003",
                    "Seed Investors",
                    HolderType::Investor,
                    1_500_000,
                    "Preferred A",
                )
            },
            Shareholder {
                allocated: Some(250_000),
                available: Some(750_000),
                ..holder(
                    "holder_004",
                    "Employee Option Pool",
                    HolderType::Pool,
                    1_000_000,
                    "Common",
                )
            },
            Shareholder {
                vesting_schedule: Some("2-year cliff, monthly vesting".to_string()),
                ..holder("holder_005", "Advisor", HolderType::Advisor, 150_000, "Common")
            },
            Shareholder {
                vesting_schedule: Some(VESTING_4Y.to_string()),
                ..holder("holder_006", "Early Employee", HolderType::Employee, 350_000, "Common")
            },
        ];

        Ok(CapTable {
            company: ShareSummary {
                name: "TechStart Inc.".to_string(),
                total_shares: 10_000_000,
                outstanding_shares: 7_500_000,
                fully_diluted_shares: FULLY_DILUTED_SHARES,
            },
            shareholders,
            summary: FundingSummary {
                total_investors: 1,
                total_raised: 500_000,
                current_valuation: 3_000_000,
                last_round: FundingRound {
                    round_type: "Seed".to_string(),
                    amount: 500_000,
                    valuation: 3_000_000,
                    date: "2024-01-15".to_string(),
                },
            },
            generated_at: Utc::now(),
        })
    }

    async fn valuation_409a(&self) -> Result<Valuation409a, AppError> {
        Ok(Valuation409a {
            current: CurrentValuation {
                value: 3_000_000,
                date: "2024-06-01".to_string(),
                method: "OPM (Option Pricing Method)".to_string(),
                assumptions: ValuationAssumptions {
                    risk_free_rate: 0.0425,
                    volatility: 0.65,
                    time_to_exit: 7.0,
                    discount_rate: 0.15,
                },
            },
            history: vec![
                HistoricalValuation {
                    value: 2_500_000,
                    date: "2024-01-15".to_string(),
                    method: "OPM".to_string(),
                    round: "Seed".to_string(),
                },
                HistoricalValuation {
                    value: 2_000_000,
                    date: "2023-08-01".to_string(),
                    method: "Backsolve".to_string(),
                    round: "Pre-seed".to_string(),
                },
            ],
            next_review: "2024-12-01".to_string(),
            status: "current".to_string(),
        })
    }

    async fn share_classes(&self) -> Result<Vec<ShareClass>, AppError> {
        Ok(vec![
            ShareClass {
                name: "Common".to_string(),
                total_shares: 6_000_000,
                outstanding: 5_750_000,
                rights: ShareRights {
                    voting: "1 vote per share".to_string(),
                    dividends: "Non-cumulative".to_string(),
                    liquidation: "Pro-rata after preferred".to_string(),
                    conversion: None,
                },
                preferences: None,
            },
            ShareClass {
                name: "Preferred A".to_string(),
                total_shares: 2_000_000,
                outstanding: 1_500_000,
                rights: ShareRights {
                    voting: "1 vote per share".to_string(),
                    dividends: "8% annual, cumulative".to_string(),
                    liquidation: "1x preference + participation".to_string(),
                    conversion: Some("1:1 to Common".to_string()),
                },
                preferences: Some(SharePreferences {
                    dividend: 0.08,
                    liquidation: 1.0,
                }),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_of() {
        assert_eq!(percentage_of(3_000_000, 8_500_000), 35.29);
        assert_eq!(percentage_of(150_000, 8_500_000), 1.76);
        assert_eq!(percentage_of(1, 0), 0.0);
    }

    #[tokio::test]
    async fn test_cap_table_adds_up() {
        let table = MockCapTableProvider.cap_table().await.unwrap();
        let total: u64 = table.shareholders.iter().map(|h| h.shares).sum();
        assert_eq!(total, table.company.fully_diluted_shares);

        let investors = table
            .shareholders
            .iter()
            .filter(|h| h.holder_type == HolderType::Investor)
            .count();
        assert_eq!(investors as u32, table.summary.total_investors);
    }

    #[tokio::test]
    async fn test_cap_table_json_shape() {
        let table = MockCapTableProvider.cap_table().await.unwrap();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["company"]["fullyDilutedShares"], 8_500_000);
        assert_eq!(json["shareholders"][0]["type"], "founder");
        assert_eq!(json["shareholders"][0]["shareClass"], "Common");
        assert!(json["shareholders"][0].get("investment").is_none());
        assert_eq!(json["shareholders"][2]["investment"], 500_000);
        assert_eq!(json["summary"]["lastRound"]["type"], "Seed");
    }

    #[tokio::test]
    async fn test_share_classes() {
        let classes = MockCapTableProvider.share_classes().await.unwrap();
        assert_eq!(classes.len(), 2);
        assert!(classes[0].preferences.is_none());
        assert_eq!(
            classes[1].rights.conversion.as_deref(),
            Some("1:1 to Common")
        );
    }
}
