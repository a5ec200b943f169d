//! API middleware.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use arbiter_common::ModerationConfig;
use arbiter_core::{AdminPolicy, AuthService, ModerationService, ProfileService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub moderation_service: ModerationService,
    pub profile_service: ProfileService,
    pub auth_service: AuthService,
    pub admin_policy: Arc<AdminPolicy>,
    /// Snapshot of the moderation flags, exposed by the health endpoint.
    pub moderation_config: Arc<ModerationConfig>,
}

/// Authentication middleware.
///
/// Verifies the bearer token, if any, and stores the resulting actor in the
/// request extensions. Requests without a valid token continue
/// unauthenticated; extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(actor) = state.auth_service.verify(token)
    {
        req.extensions_mut().insert(actor);
    }

    next.run(req).await
}
