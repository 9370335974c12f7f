use crate::errors::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    pub expiration: DateTime<Utc>,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    pub item_id: String,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balances {
    pub available: f64,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub balances: Balances,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancesResponse {
    pub accounts: Vec<Account>,
    pub item: Item,
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: f64,
    /// ISO date (`YYYY-MM-DD`).
    pub date: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    pub category: Vec<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub item: Item,
    pub total_transactions: usize,
    pub request_id: String,
}

/// Bank-data aggregation (Plaid-shaped).
#[async_trait]
pub trait FinancialsProvider: Send + Sync {
    async fn create_link_token(&self) -> Result<LinkToken, AppError>;

    async fn exchange_public_token(&self, public_token: &str) -> Result<TokenExchange, AppError>;

    async fn account_balances(&self) -> Result<BalancesResponse, AppError>;

    async fn transactions(&self) -> Result<TransactionsResponse, AppError>;
}

/// Returns fixed sandbox accounts.
#[derive(Debug, Clone, Default)]
pub struct MockFinancialsProvider;

const MOCK_ITEM_ID: &str = "item_mock_123";
const CHECKING_ACCOUNT_ID: &str = "acc_checking_001";

fn stamp() -> i64 {
    Utc::now().timestamp_millis()
}

#[async_trait]
impl FinancialsProvider for MockFinancialsProvider {
    async fn create_link_token(&self) -> Result<LinkToken, AppError> {
        let now = stamp();
        Ok(LinkToken {
            link_token: format!("link-mock-{}", now),
            expiration: Utc::now() + Duration::hours(1),
            request_id: format!("req_mock_{}", now),
        })
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<TokenExchange, AppError> {
        if public_token.trim().is_empty() {
            return Err(AppError::BadRequest("public_token is required".to_string()));
        }
        let now = stamp();
        Ok(TokenExchange {
            access_token: format!("access-mock-{}", now),
            item_id: format!("item-mock-{}", now),
            request_id: format!("req_exchange_{}", now),
        })
    }

    async fn account_balances(&self) -> Result<BalancesResponse, AppError> {
        Ok(BalancesResponse {
            accounts: vec![
                Account {
                    account_id: CHECKING_ACCOUNT_ID.to_string(),
                    balances: Balances {
                        available: 2500.5,
                        current: 2500.5,
                        iso_currency_code: Some("USD".to_string()),
                    },
                    name: Some("Checking Account".to_string()),
                    account_type: Some("depository".to_string()),
                    subtype: Some("checking".to_string()),
                },
                Account {
                    account_id: "acc_savings_001".to_string(),
                    balances: Balances {
                        available: 15000.75,
                        current: 15000.75,
                        iso_currency_code: Some("USD".to_string()),
                    },
                    name: Some("High Yield Savings".to_string()),
                    account_type: Some("depository".to_string()),
                    subtype: Some("savings".to_string()),
                },
            ],
            item: Item {
                item_id: MOCK_ITEM_ID.to_string(),
                institution_id: Some("ins_1".to_string()),
                webhook: None,
            },
            request_id: format!("req_balances_{}", stamp()),
        })
    }

    async fn transactions(&self) -> Result<TransactionsResponse, AppError> {
        let today = Utc::now().date_naive();
        let transactions = vec![
            Transaction {
                transaction_id: "txn_001".to_string(),
                account_id: CHECKING_ACCOUNT_ID.to_string(),
                amount: -25.0,
                date: today.to_string(),
                name: "Coffee Shop".to_string(),
                merchant_name: Some("Starbucks".to_string()),
                category: vec!["Food and Drink".to_string(), "Coffee Shop".to_string()],
                pending: false,
            },
            Transaction {
                transaction_id: "txn_002".to_string(),
                account_id: CHECKING_ACCOUNT_ID.to_string(),
                amount: 1500.0,
                date: (today - Duration::days(1)).to_string(),
                name: "Salary Deposit".to_string(),
                merchant_name: None,
                category: vec!["Transfer".to_string(), "Deposit".to_string()],
                pending: false,
            },
        ];

        Ok(TransactionsResponse {
            accounts: vec![Account {
                account_id: CHECKING_ACCOUNT_ID.to_string(),
                balances: Balances {
                    available: 2500.5,
                    current: 2500.5,
                    iso_currency_code: None,
                },
                name: None,
                account_type: None,
                subtype: None,
            }],
            total_transactions: transactions.len(),
            transactions,
            item: Item {
                item_id: MOCK_ITEM_ID.to_string(),
                institution_id: None,
                webhook: None,
            },
            request_id: format!("req_transactions_{}", stamp()),
        })
    }
}
