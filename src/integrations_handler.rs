//! Routes backed by the verification, financials and cap-table providers.
//!
//! `/kyc/verify` and `/financials/link` update the caller's company; the
//! persona/plaid/carta routes expose the provider payloads directly.

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::integrations::cap_table::{CapTable, ShareClass, Valuation409a};
use crate::integrations::financials::{
    BalancesResponse, LinkToken, TokenExchange, TransactionsResponse,
};
use crate::integrations::verification::{InquiryStatus, VerificationResult};
use crate::models::{
    KycVerifyRequest, KycVerifyResponse, LinkFinancialsRequest, LinkFinancialsResponse,
};
use crate::user_context::UserContext;
use crate::validation::validate_link_financials;
use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;

/// POST /api/kyc/verify
///
/// Runs identity verification and, when approved, marks the caller's company as
/// verified. The body is optional.
pub async fn verify_kyc(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    body: Bytes,
) -> Result<Json<KycVerifyResponse>, AppError> {
    let request: KycVerifyRequest = optional_json(&body)?;
    tracing::info!(
        "POST /kyc/verify - user: {}, inquiry: {:?}",
        user.user_id,
        request.inquiry_id
    );

    let result = state
        .verification
        .verify(request.inquiry_id.as_deref(), request.document_type)
        .await?;

    if !result.is_approved() {
        tracing::warn!(
            "Verification for {} not approved: {} / {}",
            user.user_id,
            result.status,
            result.outcome
        );
        return Ok(Json(KycVerifyResponse { verified: false }));
    }

    state.storage().mark_kyc_verified(&user).await?;
    tracing::info!("✓ KYC verified for user {}", user.user_id);

    Ok(Json(KycVerifyResponse { verified: true }))
}

/// POST /api/financials/link
///
/// Exchanges the public token with the financials provider and marks the
/// caller's company as linked.
pub async fn link_financials(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(payload): Json<LinkFinancialsRequest>,
) -> Result<Json<LinkFinancialsResponse>, AppError> {
    tracing::info!(
        "POST /financials/link - user: {}, institution: {:?}",
        user.user_id,
        payload.institution_name
    );

    validate_link_financials(&payload)?;

    let exchange = state.financials.exchange_public_token(&payload.token).await?;
    tracing::debug!("Financials item {} linked", exchange.item_id);

    state.storage().mark_financials_linked(&user).await?;
    tracing::info!("✓ Financials linked for user {}", user.user_id);

    Ok(Json(LinkFinancialsResponse { linked: true }))
}

/// POST /api/persona/verify
pub async fn persona_verify(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<VerificationResult>, AppError> {
    let request: KycVerifyRequest = optional_json(&body)?;
    let result = state
        .verification
        .verify(request.inquiry_id.as_deref(), request.document_type)
        .await?;
    Ok(Json(result))
}

/// GET /api/persona/status/:inquiry_id
pub async fn persona_status(
    State(state): State<Arc<AppState>>,
    Path(inquiry_id): Path<String>,
) -> Result<Json<InquiryStatus>, AppError> {
    Ok(Json(state.verification.inquiry_status(&inquiry_id).await?))
}

/// POST /api/plaid/link/token/create
pub async fn plaid_create_link_token(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LinkToken>, AppError> {
    Ok(Json(state.financials.create_link_token().await?))
}

#[derive(Debug, Deserialize)]
pub struct PublicTokenExchangeRequest {
    pub public_token: String,
}

/// POST /api/plaid/item/public_token/exchange
pub async fn plaid_exchange_public_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PublicTokenExchangeRequest>,
) -> Result<Json<TokenExchange>, AppError> {
    Ok(Json(
        state
            .financials
            .exchange_public_token(&payload.public_token)
            .await?,
    ))
}

/// POST /api/plaid/accounts/balance/get
pub async fn plaid_account_balances(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalancesResponse>, AppError> {
    Ok(Json(state.financials.account_balances().await?))
}

/// POST /api/plaid/transactions/get
pub async fn plaid_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransactionsResponse>, AppError> {
    Ok(Json(state.financials.transactions().await?))
}

/// GET /api/carta/cap-table
pub async fn carta_cap_table(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CapTable>, AppError> {
    Ok(Json(state.cap_table.cap_table().await?))
}

/// GET /api/carta/409a
pub async fn carta_409a(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Valuation409a>, AppError> {
    Ok(Json(state.cap_table.valuation_409a().await?))
}

/// GET /api/carta/share-classes
pub async fn carta_share_classes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShareClass>>, AppError> {
    Ok(Json(state.cap_table.share_classes().await?))
}

/// Parses a JSON body that clients may omit entirely; an empty body yields the default.
fn optional_json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;

    #[test]
    fn test_optional_json_empty_body_is_default() {
        let request: KycVerifyRequest = optional_json(b"").unwrap();
        assert!(request.inquiry_id.is_none());
        assert!(request.document_type.is_none());

        let request: KycVerifyRequest = optional_json(b"  \n").unwrap();
        assert!(request.inquiry_id.is_none());
    }

    #[test]
    fn test_optional_json_parses_fields() {
        let request: KycVerifyRequest =
            optional_json(br#"{"inquiryId":"inq_9","documentType":"passport"}"#).unwrap();
        assert_eq!(request.inquiry_id.as_deref(), Some("inq_9"));
        assert_eq!(request.document_type, Some(DocumentType::Passport));
    }

    #[test]
    fn test_optional_json_rejects_unknown_document_type() {
        let err = optional_json::<KycVerifyRequest>(br#"{"documentType":"library_card"}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
