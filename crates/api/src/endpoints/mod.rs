//! API endpoints.

mod moderation;
mod profiles;
mod reports;

use axum::Router;

use crate::middleware::AppState;
use crate::rate_limit::RateLimiterState;

/// Create the API router.
pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::router(limiter))
        .nest("/moderation", moderation::router())
        .nest("/profiles", profiles::router())
}
