use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============ Database Models ============

/// A founder account. Identity is supplied by the caller, never generated here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The founder's company; one per user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Unique identifier for the company.
    pub id: Uuid,
    /// Owning user.
    pub user_id: String,
    /// Legal or trading name.
    pub name: String,
    /// Industry sector.
    pub sector: String,
    /// Amount the founder is raising.
    pub target_raise: f64,
    /// Self-reported annual revenue.
    pub revenue: f64,
    /// Identity verification completed.
    pub kyc_verified: bool,
    /// Bank-data connection established.
    pub financials_linked: bool,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// An uploaded file stored on local disk.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Original file name as sent by the client.
    pub name: String,
    pub mime_type: String,
    /// Bytes written to disk.
    pub size: i64,
    /// Location on disk.
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Support chat message attached to a company.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub company_id: Uuid,
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Event types recorded in the notifications table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    CompanyUpdated,
    KycVerified,
    FinancialsLinked,
    FileUploaded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::CompanyUpdated => "company_updated",
            NotificationKind::KycVerified => "kyc_verified",
            NotificationKind::FinancialsLinked => "financials_linked",
            NotificationKind::FileUploaded => "file_uploaded",
        }
    }
}

/// Who wrote a support chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Support,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Support => "support",
        }
    }
}

// ============ Request Models ============

/// Body of `POST /api/company`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub name: String,
    pub sector: String,
    pub target_raise: f64,
    pub revenue: f64,
}

/// Body of `PATCH /api/company`; every field optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub target_raise: Option<f64>,
    pub revenue: Option<f64>,
}

/// Identity document accepted by the verification provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    DriversLicense,
    Passport,
    NationalId,
}

/// Body of `POST /api/kyc/verify` and `POST /api/persona/verify`; may be omitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycVerifyRequest {
    pub inquiry_id: Option<String>,
    pub document_type: Option<DocumentType>,
}

/// Body of `POST /api/financials/link`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFinancialsRequest {
    pub token: String,
    pub institution_name: Option<String>,
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
    pub sender: Sender,
}

// ============ Response Models ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KycVerifyResponse {
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFinancialsResponse {
    pub linked: bool,
}
