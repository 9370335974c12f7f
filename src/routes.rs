use crate::files_handler;
use crate::handlers::{self, AppState};
use crate::integrations_handler;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Headroom for multipart boundaries and part headers on top of the file limit.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;
/// Body limit for every JSON route.
const JSON_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Application routes with their body limits.
///
/// Rate limiting, tracing and CORS are layered on by the binary so tests can drive
/// this router directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = usize::try_from(state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES)
        .unwrap_or(usize::MAX);

    let upload_routes = Router::new()
        .route(
            "/api/files",
            post(files_handler::upload_file).get(files_handler::list_files),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit));

    let api_routes = Router::new()
        // Onboarding records
        .route(
            "/api/company",
            post(handlers::save_company)
                .patch(handlers::update_company)
                .get(handlers::get_company),
        )
        .route("/api/score", get(handlers::get_score))
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/:id/read",
            patch(handlers::mark_notification_read),
        )
        .route(
            "/api/messages",
            post(handlers::send_message).get(handlers::list_messages),
        )
        // Provider-backed flows
        .route("/api/kyc/verify", post(integrations_handler::verify_kyc))
        .route(
            "/api/financials/link",
            post(integrations_handler::link_financials),
        )
        .route(
            "/api/persona/verify",
            post(integrations_handler::persona_verify),
        )
        .route(
            "/api/persona/status/:inquiry_id",
            get(integrations_handler::persona_status),
        )
        .route(
            "/api/plaid/link/token/create",
            post(integrations_handler::plaid_create_link_token),
        )
        .route(
            "/api/plaid/item/public_token/exchange",
            post(integrations_handler::plaid_exchange_public_token),
        )
        .route(
            "/api/plaid/accounts/balance/get",
            post(integrations_handler::plaid_account_balances),
        )
        .route(
            "/api/plaid/transactions/get",
            post(integrations_handler::plaid_transactions),
        )
        .route(
            "/api/carta/cap-table",
            get(integrations_handler::carta_cap_table),
        )
        .route("/api/carta/409a", get(integrations_handler::carta_409a))
        .route(
            "/api/carta/share-classes",
            get(integrations_handler::carta_share_classes),
        )
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT_BYTES));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(upload_routes)
        .merge(api_routes)
        .with_state(state)
}
