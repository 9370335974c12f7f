use founder_onboarding_api::config::Config;
use founder_onboarding_api::db::Database;
use founder_onboarding_api::handlers::AppState;
use founder_onboarding_api::routes::build_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes tracing, configuration, the database pool (running migrations) and
/// the mock third-party providers, then serves the API with CORS, per-IP rate
/// limiting and request tracing.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "founder_onboarding_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!("Upload directory ready: {}", config.upload_dir.display());

    let app_state = Arc::new(AppState::with_mock_providers(db.pool.clone(), config.clone()));
    tracing::info!("Mock verification, financials and cap-table providers initialized");

    // Rate limiter: RATE_LIMIT_PER_MINUTE requests per IP, replenished evenly
    let per_request = Duration::from_secs(60) / config.rate_limit_per_minute;
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(per_request)
            .burst_size(config.rate_limit_per_minute)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    let app = build_router(app_state)
        .layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
