//! Report endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use arbiter_common::{AppError, AppResult};
use arbiter_core::{CreateReportInput, ReportDetail};
use arbiter_db::entities::{
    moderation_action,
    moderation_report::{self, ReportReason, ReportSeverity, ReportStatus, TargetType},
};

use crate::{
    extractors::{AdminActor, AuthActor},
    middleware::AppState,
    rate_limit::{self, RateLimiterState},
    response::ApiResponse,
};

/// Report response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: Option<String>,
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    pub severity: String,
    pub status: String,
    pub created_at: String,
}

impl From<moderation_report::Model> for ReportResponse {
    fn from(report: moderation_report::Model) -> Self {
        Self {
            id: report.id,
            reporter_id: report.reporter_id,
            target_type: report.target_type.as_str().to_string(),
            target_id: report.target_id,
            reason: report.reason.as_str().to_string(),
            severity: report.severity.as_str().to_string(),
            status: report.status.as_str().to_string(),
            created_at: report.created_at.to_rfc3339(),
        }
    }
}

/// Recorded action response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub id: String,
    pub admin_id: String,
    pub action: String,
    pub created_at: String,
}

impl From<moderation_action::Model> for ActionResponse {
    fn from(action: moderation_action::Model) -> Self {
        Self {
            id: action.id,
            admin_id: action.admin_id,
            action: action.action.as_str().to_string(),
            created_at: action.created_at.to_rfc3339(),
        }
    }
}

/// Report with action history.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailResponse {
    #[serde(flatten)]
    pub report: ReportResponse,
    pub actions: Vec<ActionResponse>,
}

impl From<ReportDetail> for ReportDetailResponse {
    fn from(detail: ReportDetail) -> Self {
        Self {
            report: detail.report.into(),
            actions: detail.actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create report request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub target_type: String,
    pub target_id: String,
    pub reason: String,
    #[serde(default)]
    pub severity: Option<String>,
}

/// List reports query.
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    20
}

pub(crate) fn parse_target_type(value: &str) -> AppResult<TargetType> {
    match value {
        "profile" => Ok(TargetType::Profile),
        "media" => Ok(TargetType::Media),
        "message" => Ok(TargetType::Message),
        _ => Err(AppError::Validation(format!(
            "Invalid target type: {value}"
        ))),
    }
}

pub(crate) fn parse_reason(value: &str) -> AppResult<ReportReason> {
    match value {
        "profanity" => Ok(ReportReason::Profanity),
        "spam" => Ok(ReportReason::Spam),
        "impersonation" => Ok(ReportReason::Impersonation),
        "other" => Ok(ReportReason::Other),
        _ => Err(AppError::Validation(format!("Invalid reason: {value}"))),
    }
}

pub(crate) fn parse_severity(value: &str) -> AppResult<ReportSeverity> {
    match value {
        "low" => Ok(ReportSeverity::Low),
        "medium" => Ok(ReportSeverity::Medium),
        "high" => Ok(ReportSeverity::High),
        _ => Err(AppError::Validation(format!("Invalid severity: {value}"))),
    }
}

pub(crate) fn parse_status(value: &str) -> AppResult<ReportStatus> {
    match value {
        "open" => Ok(ReportStatus::Open),
        "reviewing" => Ok(ReportStatus::Reviewing),
        "resolved" => Ok(ReportStatus::Resolved),
        "dismissed" => Ok(ReportStatus::Dismissed),
        _ => Err(AppError::Validation(format!("Invalid status: {value}"))),
    }
}

/// Submit a report.
async fn create_report(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Json(req): Json<CreateReportRequest>,
) -> AppResult<ApiResponse<ReportResponse>> {
    let severity = match req.severity.as_deref() {
        Some(value) => parse_severity(value)?,
        None => ReportSeverity::Low,
    };

    let report = state
        .moderation_service
        .create_report(
            &actor.id,
            CreateReportInput {
                target_type: parse_target_type(&req.target_type)?,
                target_id: req.target_id,
                reason: parse_reason(&req.reason)?,
                severity,
            },
        )
        .await?;

    Ok(ApiResponse::created(report.into()))
}

/// List reports (admin only).
async fn list_reports(
    AdminActor(_admin): AdminActor,
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> AppResult<ApiResponse<Vec<ReportResponse>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let severity = query.severity.as_deref().map(parse_severity).transpose()?;

    let limit = query.limit.clamp(1, 100);
    let offset = query.page.saturating_mul(limit);

    let reports = state
        .moderation_service
        .list_reports(status, severity, limit, offset)
        .await?;

    Ok(ApiResponse::ok(reports.into_iter().map(Into::into).collect()))
}

/// Get a report with its action history (admin only).
async fn get_report(
    AdminActor(_admin): AdminActor,
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> AppResult<ApiResponse<ReportDetailResponse>> {
    let detail = state.moderation_service.get_report_detail(&report_id).await?;

    Ok(ApiResponse::ok(detail.into()))
}

/// Create the reports router.
pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_report).get(list_reports))
        .route("/{id}", get(get_report))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit::report_rate_limit_middleware,
        ))
}
