//! Caller identity.
//!
//! There is no session layer; each request names its user through headers and the
//! resulting [`UserContext`] is passed explicitly to every handler and storage call.

use crate::errors::AppError;
use crate::validation::is_valid_email;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
const MAX_USER_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
    pub email: Option<String>,
}

impl UserContext {
    pub fn new(user_id: &str, email: Option<&str>) -> Result<Self, AppError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::Unauthorized("Missing user identity".to_string()));
        }
        if user_id.len() > MAX_USER_ID_LEN
            || !user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@'))
        {
            return Err(AppError::Unauthorized("Malformed user identity".to_string()));
        }

        let email = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(e) if is_valid_email(e) => Some(e.to_string()),
            Some(_) => {
                return Err(AppError::BadRequest(
                    "Valid email is required".to_string(),
                ))
            }
            None => None,
        };

        Ok(Self {
            user_id: user_id.to_string(),
            email,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER))
            })?;

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok());

        UserContext::new(user_id, email)
    }
}
