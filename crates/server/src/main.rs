//! Arbiter server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arbiter_api::{
    RateLimiterState, middleware::AppState, rate_limit::rate_limit_middleware,
    router as api_router,
};
use arbiter_common::{Config, ModerationConfig};
use arbiter_core::{
    AdminPolicy, AlertService, AuthService, ContentScanner, ModerationService, ProfileService,
};
use arbiter_db::repositories::{ModerationRepository, ProfileRepository};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        #[allow(clippy::expect_used)]
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        #[allow(clippy::expect_used)]
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbiter=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting arbiter server...");

    // Load configuration
    let config = Config::load()?;
    let moderation_config = ModerationConfig::from_env()?;

    // Connect to database and run migrations
    let db = arbiter_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    arbiter_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let moderation_repo = ModerationRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));

    // Initialize services
    let scanner = Arc::new(ContentScanner::new(&moderation_config));
    let alerts = AlertService::new(&moderation_config);
    let moderation_service = ModerationService::new(
        moderation_repo,
        alerts,
        moderation_config.reports_enabled,
    );
    let profile_service = ProfileService::new(
        profile_repo,
        moderation_service.clone(),
        scanner,
        &moderation_config,
    );
    let auth_service = AuthService::new(&config.auth.token_secret);
    let admin_policy = Arc::new(AdminPolicy::new(&moderation_config));

    if !moderation_config.moderation_enabled {
        info!("Content moderation gate is disabled");
    }

    let state = AppState {
        moderation_service,
        profile_service,
        auth_service,
        admin_policy,
        moderation_config: Arc::new(moderation_config),
    };

    // Separate limiter states so the restrictive report class does not share
    // window counters with the standard class.
    let standard_limiter = RateLimiterState::new();
    let report_limiter = RateLimiterState::new();

    let app = api_router(report_limiter)
        .layer(middleware::from_fn_with_state(
            standard_limiter,
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            arbiter_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
