//! Moderation decision endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use arbiter_common::{AppError, AppResult};
use arbiter_core::RecordDecisionInput;
use arbiter_db::entities::moderation_action::ActionKind;

use crate::{
    endpoints::reports::ReportResponse, extractors::AdminActor, middleware::AppState,
    response::ApiResponse,
};

/// Record decision request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDecisionRequest {
    pub report_id: String,
    pub action: String,
}

/// Dismiss/review request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportIdRequest {
    pub report_id: String,
}

/// Health response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub moderation_enabled: bool,
    pub reports_enabled: bool,
    pub strict_mode: bool,
}

fn parse_action(value: &str) -> AppResult<ActionKind> {
    match value {
        "allow" => Ok(ActionKind::Allow),
        "warn" => Ok(ActionKind::Warn),
        "remove" => Ok(ActionKind::Remove),
        "ban" => Ok(ActionKind::Ban),
        _ => Err(AppError::Validation(format!("Invalid action: {value}"))),
    }
}

/// Record a decision against a report (admin only).
async fn record_decision(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Json(req): Json<RecordDecisionRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .record_decision(
            &admin.id,
            RecordDecisionInput {
                report_id: req.report_id,
                action: parse_action(&req.action)?,
            },
        )
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Dismiss a report without action (admin only).
async fn dismiss_report(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Json(req): Json<ReportIdRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .dismiss_report(&admin.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Mark a report as being reviewed (admin only).
async fn review_report(
    AdminActor(admin): AdminActor,
    State(state): State<AppState>,
    Json(req): Json<ReportIdRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let report = state
        .moderation_service
        .mark_reviewing(&admin.id, &req.report_id)
        .await?;

    Ok(ApiResponse::ok(report.into()))
}

/// Moderation health check (public).
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        moderation_enabled: state.moderation_config.moderation_enabled,
        reports_enabled: state.moderation_config.reports_enabled,
        strict_mode: state.moderation_config.moderation_strict_mode,
    })
}

/// Create the moderation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/decision", post(record_decision))
        .route("/dismiss", post(dismiss_report))
        .route("/review", post(review_report))
        .route("/health", get(health))
}
