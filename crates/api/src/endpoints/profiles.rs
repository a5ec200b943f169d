//! Profile endpoints.
//!
//! Writes go through the moderation gate in the profile service.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;

use arbiter_common::{AppError, AppResult};
use arbiter_core::UpdateProfileInput;
use arbiter_db::entities::profile;

use crate::{extractors::AuthActor, middleware::AppState, response::ApiResponse};

/// Profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub links: Vec<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<profile::Model> for ProfileResponse {
    fn from(profile: profile::Model) -> Self {
        let links = profile.link_urls();
        Self {
            id: profile.id,
            user_id: profile.user_id,
            display_name: profile.display_name,
            headline: profile.headline,
            bio: profile.bio,
            location: profile.location,
            links,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Get a profile.
async fn get_profile(
    AuthActor(_actor): AuthActor,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.get_profile(&user_id).await?;

    Ok(ApiResponse::ok(profile.into()))
}

/// Update a profile (owner or admin).
async fn update_profile(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    if actor.id != user_id && !state.admin_policy.is_admin(&actor) {
        return Err(AppError::Forbidden(
            "Cannot update another user's profile".to_string(),
        ));
    }

    let profile = state.profile_service.update_profile(&user_id, input).await?;

    Ok(ApiResponse::ok(profile.into()))
}

/// Create the profiles router.
pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_profile).put(update_profile))
}
