use crate::config::Config;
use crate::db_storage::OnboardingStorage;
use crate::demo;
use crate::errors::AppError;
use crate::integrations::{
    CapTableProvider, FinancialsProvider, MockCapTableProvider, MockFinancialsProvider,
    MockVerificationProvider, VerificationProvider,
};
use crate::models::*;
use crate::scoring::{score_profile, ScoreReport};
use crate::user_context::UserContext;
use crate::validation::{validate_company, validate_company_patch, validate_message};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Identity verification (KYC) provider.
    pub verification: Arc<dyn VerificationProvider>,
    /// Bank-data aggregation provider.
    pub financials: Arc<dyn FinancialsProvider>,
    /// Cap-table provider.
    pub cap_table: Arc<dyn CapTableProvider>,
}

impl AppState {
    /// State wired to the static mock providers.
    pub fn with_mock_providers(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config,
            verification: Arc::new(MockVerificationProvider),
            financials: Arc::new(MockFinancialsProvider),
            cap_table: Arc::new(MockCapTableProvider),
        }
    }

    pub fn storage(&self) -> OnboardingStorage {
        OnboardingStorage::new(self.db.clone())
    }
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "founder-onboarding-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/company
///
/// Creates or replaces the caller's company profile.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The calling founder.
/// * `payload` - Company name, sector, target raise and revenue.
///
/// # Returns
///
/// * `Result<Json<Company>, AppError>` - The stored company, or 400 on invalid input.
pub async fn save_company(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(payload): Json<CompanyRequest>,
) -> Result<Json<Company>, AppError> {
    tracing::info!("POST /company - user: {}", user.user_id);

    let company = validate_company(&payload)?;
    let saved = state.storage().save_company(&user, &company).await?;

    Ok(Json(saved))
}

/// PATCH /api/company
///
/// Updates any subset of the company fields. 404 when no company exists yet.
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(payload): Json<CompanyPatch>,
) -> Result<Json<Company>, AppError> {
    tracing::info!("PATCH /company - user: {}", user.user_id);

    let patch = validate_company_patch(&payload)?;
    if patch.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    state
        .storage()
        .update_company(&user, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}

/// GET /api/company
///
/// # Returns
///
/// * `Result<Json<Company>, AppError>` - The caller's company; 404 when none exists
///   (the sample company when demo fallbacks are on).
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Company>, AppError> {
    tracing::info!("GET /company - user: {}", user.user_id);

    match state.storage().find_company(&user.user_id).await? {
        Some(company) => Ok(Json(company)),
        None if state.config.demo_fallbacks => {
            tracing::debug!("No company for {}, serving sample", user.user_id);
            Ok(Json(demo::sample_company(&user.user_id)))
        }
        None => Err(AppError::NotFound("Company not found".to_string())),
    }
}

/// GET /api/score
///
/// Scores the caller's current profile. A caller without a company gets the
/// default snapshot (score 0), never sample data.
pub async fn get_score(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<ScoreReport>, AppError> {
    let snapshot = state.storage().profile_snapshot(&user.user_id).await?;
    let report = score_profile(&snapshot);

    tracing::info!(
        "GET /score - user: {}, score: {}, documents: {}",
        user.user_id,
        report.score,
        snapshot.document_count()
    );

    Ok(Json(report))
}

/// GET /api/notifications
///
/// Newest first.
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.storage().list_notifications(&user.user_id).await?;

    if notifications.is_empty() && state.config.demo_fallbacks {
        return Ok(Json(demo::sample_notifications(
            &user.user_id,
            chrono::Utc::now(),
        )));
    }

    Ok(Json(notifications))
}

/// PATCH /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    tracing::info!("PATCH /notifications/{}/read - user: {}", id, user.user_id);

    state
        .storage()
        .mark_notification_read(&user.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
}

/// POST /api/messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<Message>, AppError> {
    tracing::info!(
        "POST /messages - user: {}, sender: {}",
        user.user_id,
        payload.sender.as_str()
    );

    let content = validate_message(&payload)?;
    let message = state
        .storage()
        .post_message(&user, payload.sender, &content)
        .await?;

    Ok(Json(message))
}

/// GET /api/messages
///
/// Oldest first.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.storage().list_messages(&user.user_id).await?;

    if messages.is_empty() && state.config.demo_fallbacks {
        return Ok(Json(demo::sample_messages(chrono::Utc::now())));
    }

    Ok(Json(messages))
}
