//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};

use arbiter_common::AppError;
use arbiter_core::Actor;

use crate::middleware::AppState;

/// Authenticated actor extractor.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl<S> FromRequestParts<S> for AuthActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the bearer token verified
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(AuthActor)
            .ok_or(AppError::Unauthorized)
    }
}

/// Admin actor extractor.
///
/// Rejects with 401 when unauthenticated and 403 when the actor's role is
/// not on the admin allowlist.
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

impl FromRequestParts<AppState> for AdminActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        if !state.admin_policy.is_admin(&actor) {
            return Err(AppError::Forbidden(
                "Admin capability required".to_string(),
            ));
        }

        Ok(Self(actor))
    }
}
