//! Input validation for request bodies and uploads.
//!
//! Every check returns `AppError::BadRequest` with a message safe to show the client.

use crate::errors::AppError;
use crate::models::{CompanyPatch, CompanyRequest, LinkFinancialsRequest, SendMessageRequest};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const MAX_COMPANY_NAME_LEN: usize = 100;
pub const MAX_SECTOR_LEN: usize = 50;
pub const MAX_MONEY_AMOUNT: f64 = 1_000_000_000.0;
pub const MAX_MESSAGE_LEN: usize = 1000;
pub const MAX_INSTITUTION_NAME_LEN: usize = 100;
/// Stored uploads are named `{unix_millis}-{name}`; this reserves room for the
/// prefix inside the 255-byte file-name limit of common filesystems.
pub const UPLOAD_NAME_PREFIX_BYTES: usize = 15;
pub const MAX_FILE_NAME_BYTES: usize = 255 - UPLOAD_NAME_PREFIX_BYTES;

/// MIME types accepted by `POST /api/files`.
pub const ALLOWED_UPLOAD_TYPES: [&str; 3] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Company fields after validation; `name` and `sector` are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCompany {
    pub name: String,
    pub sector: String,
    pub target_raise: f64,
    pub revenue: f64,
}

/// Partial company update after validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidCompanyPatch {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub target_raise: Option<f64>,
    pub revenue: Option<f64>,
}

impl ValidCompanyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sector.is_none()
            && self.target_raise.is_none()
            && self.revenue.is_none()
    }
}

pub fn validate_company(req: &CompanyRequest) -> Result<ValidCompany, AppError> {
    Ok(ValidCompany {
        name: validate_text("Company name", &req.name, MAX_COMPANY_NAME_LEN)?,
        sector: validate_text("Sector", &req.sector, MAX_SECTOR_LEN)?,
        target_raise: validate_target_raise(req.target_raise)?,
        revenue: validate_revenue(req.revenue)?,
    })
}

pub fn validate_company_patch(patch: &CompanyPatch) -> Result<ValidCompanyPatch, AppError> {
    Ok(ValidCompanyPatch {
        name: patch
            .name
            .as_deref()
            .map(|n| validate_text("Company name", n, MAX_COMPANY_NAME_LEN))
            .transpose()?,
        sector: patch
            .sector
            .as_deref()
            .map(|s| validate_text("Sector", s, MAX_SECTOR_LEN))
            .transpose()?,
        target_raise: patch.target_raise.map(validate_target_raise).transpose()?,
        revenue: patch.revenue.map(validate_revenue).transpose()?,
    })
}

pub fn validate_revenue(revenue: f64) -> Result<f64, AppError> {
    if !revenue.is_finite() {
        return Err(AppError::BadRequest("Revenue must be a number".to_string()));
    }
    if revenue < 0.0 {
        return Err(AppError::BadRequest("Revenue cannot be negative".to_string()));
    }
    if revenue > MAX_MONEY_AMOUNT {
        return Err(AppError::BadRequest("Revenue too large".to_string()));
    }
    Ok(revenue)
}

pub fn validate_target_raise(target_raise: f64) -> Result<f64, AppError> {
    if !target_raise.is_finite() || target_raise <= 0.0 {
        return Err(AppError::BadRequest(
            "Target raise must be positive".to_string(),
        ));
    }
    if target_raise > MAX_MONEY_AMOUNT {
        return Err(AppError::BadRequest("Target raise too large".to_string()));
    }
    Ok(target_raise)
}

/// Returns the trimmed message content.
pub fn validate_message(req: &SendMessageRequest) -> Result<String, AppError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest(
            "Message content is required".to_string(),
        ));
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::BadRequest("Message too long".to_string()));
    }
    Ok(content.to_string())
}

pub fn validate_link_financials(req: &LinkFinancialsRequest) -> Result<(), AppError> {
    if req.token.trim().is_empty() {
        return Err(AppError::BadRequest("Plaid token is required".to_string()));
    }
    if let Some(ref institution) = req.institution_name {
        if institution.chars().count() > MAX_INSTITUTION_NAME_LEN {
            return Err(AppError::BadRequest(
                "Institution name is too long".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn is_allowed_upload_type(mime_type: &str) -> bool {
    ALLOWED_UPLOAD_TYPES.contains(&mime_type)
}

/// Reduces a client-supplied file name to its final path component.
///
/// Directory parts are dropped so the stored name can never escape the upload dir.
pub fn sanitize_file_name(raw: &str) -> Result<String, AppError> {
    let normalized = raw.replace('\\', "/");
    let base = Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .unwrap_or("");

    if base.is_empty() || base == "." || base == ".." {
        return Err(AppError::BadRequest("File name is required".to_string()));
    }
    if base.len() > MAX_FILE_NAME_BYTES {
        return Err(AppError::BadRequest("File name is too long".to_string()));
    }
    if base.chars().any(|c| c.is_control()) {
        return Err(AppError::BadRequest(
            "File name contains invalid characters".to_string(),
        ));
    }
    Ok(base.to_string())
}

/// RFC 5322 simplified email check.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

    if email.len() < 3 || email.len() > 254 {
        return false;
    }

    let re = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("email regex is valid")
    });

    re.is_match(email)
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::BadRequest(format!("{} too long", field)));
    }
    Ok(trimmed.to_string())
}
