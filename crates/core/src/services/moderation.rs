//! Moderation service for the report/decision workflow.
//!
//! Reports move `open -> reviewing -> {resolved, dismissed}`; terminal
//! states never reopen. Every recorded decision resolves the report, so
//! nothing lingers in `reviewing`; `dismissed` is only reachable through the
//! explicit no-action path.

use arbiter_common::{AppError, AppResult, IdGenerator, redact_id};
use arbiter_db::{
    entities::{
        moderation_action::{self, ActionKind},
        moderation_report::{self, ReportReason, ReportSeverity, ReportStatus, TargetType},
    },
    repositories::ModerationRepository,
};
use sea_orm::Set;

use super::alerts::AlertService;

/// Maximum length of a caller-supplied target ID.
const MAX_TARGET_ID_LENGTH: usize = 64;

/// Input for creating a report.
pub struct CreateReportInput {
    pub target_type: TargetType,
    pub target_id: String,
    pub reason: ReportReason,
    pub severity: ReportSeverity,
}

/// Input for recording a decision.
pub struct RecordDecisionInput {
    pub report_id: String,
    pub action: ActionKind,
}

/// A report together with its recorded action history.
pub struct ReportDetail {
    pub report: moderation_report::Model,
    pub actions: Vec<moderation_action::Model>,
}

/// Moderation service for reports and decisions.
#[derive(Clone)]
pub struct ModerationService {
    moderation_repo: ModerationRepository,
    alerts: AlertService,
    id_gen: IdGenerator,
    reports_enabled: bool,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(
        moderation_repo: ModerationRepository,
        alerts: AlertService,
        reports_enabled: bool,
    ) -> Self {
        Self {
            moderation_repo,
            alerts,
            id_gen: IdGenerator::new(),
            reports_enabled,
        }
    }

    // ========== Reports ==========

    /// Create a user-submitted report.
    ///
    /// The target ID is trusted as supplied; there is no foreign-key check
    /// against the reported content.
    pub async fn create_report(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<moderation_report::Model> {
        if !self.reports_enabled {
            return Err(AppError::Forbidden(
                "Report submission is disabled".to_string(),
            ));
        }

        let target_id = input.target_id.trim();
        if target_id.is_empty() {
            return Err(AppError::Validation("Target ID is required".to_string()));
        }
        if target_id.len() > MAX_TARGET_ID_LENGTH {
            return Err(AppError::Validation("Target ID too long".to_string()));
        }

        let model = moderation_report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(Some(reporter_id.to_string())),
            target_type: Set(input.target_type),
            target_id: Set(target_id.to_string()),
            reason: Set(input.reason),
            severity: Set(input.severity),
            status: Set(ReportStatus::Open),
            created_at: Set(chrono::Utc::now().into()),
        };

        let report = self.moderation_repo.create_report(model).await?;

        tracing::info!(
            report_id = %report.id,
            reporter = %redact_id(reporter_id),
            target_type = report.target_type.as_str(),
            "Moderation report created"
        );

        self.alerts.notify_report_created(&report);

        Ok(report)
    }

    /// File an automatic report from a failed content scan.
    ///
    /// Used by the profile-write gate; bypasses the submission switch since
    /// it is an internal audit record, not a user submission.
    pub async fn file_scan_report(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<moderation_report::Model> {
        let model = moderation_report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(None),
            target_type: Set(target_type),
            target_id: Set(target_id.to_string()),
            reason: Set(ReportReason::Profanity),
            severity: Set(ReportSeverity::Low),
            status: Set(ReportStatus::Open),
            created_at: Set(chrono::Utc::now().into()),
        };

        let report = self.moderation_repo.create_report(model).await?;

        tracing::info!(
            report_id = %report.id,
            target_type = report.target_type.as_str(),
            "Automatic scan report filed"
        );

        self.alerts.notify_report_created(&report);

        Ok(report)
    }

    /// List reports with optional status/severity filters, newest first.
    pub async fn list_reports(
        &self,
        status: Option<ReportStatus>,
        severity: Option<ReportSeverity>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        self.moderation_repo
            .get_reports(status, severity, limit, offset)
            .await
    }

    /// Get a report together with its action history.
    pub async fn get_report_detail(&self, report_id: &str) -> AppResult<ReportDetail> {
        let report = self.moderation_repo.get_report(report_id).await?;
        let actions = self
            .moderation_repo
            .get_actions_for_report(report_id)
            .await?;

        Ok(ReportDetail { report, actions })
    }

    /// Count reports still waiting for review.
    pub async fn count_open_reports(&self) -> AppResult<u64> {
        self.moderation_repo.count_open_reports().await
    }

    // ========== Decisions ==========

    /// Mark an open report as being reviewed.
    pub async fn mark_reviewing(
        &self,
        admin_id: &str,
        report_id: &str,
    ) -> AppResult<moderation_report::Model> {
        let report = self.moderation_repo.get_report(report_id).await?;

        if report.status != ReportStatus::Open {
            return Err(AppError::BadRequest(
                "Only open reports can be marked as reviewing".to_string(),
            ));
        }

        let mut model: moderation_report::ActiveModel = report.into();
        model.status = Set(ReportStatus::Reviewing);

        let report = self.moderation_repo.update_report(model).await?;

        tracing::info!(
            report_id = %report.id,
            admin = %redact_id(admin_id),
            "Report marked as reviewing"
        );

        Ok(report)
    }

    /// Record an admin decision against a report.
    ///
    /// The action row is always appended (the audit trail is append-only).
    /// Every decision maps to `resolved`; a report already in a terminal
    /// state keeps its status, which makes repeated decisions idempotent on
    /// the status while still being recorded.
    pub async fn record_decision(
        &self,
        admin_id: &str,
        input: RecordDecisionInput,
    ) -> AppResult<moderation_report::Model> {
        let report = self.moderation_repo.get_report(&input.report_id).await?;

        let action = moderation_action::ActiveModel {
            id: Set(self.id_gen.generate()),
            report_id: Set(report.id.clone()),
            admin_id: Set(admin_id.to_string()),
            action: Set(input.action.clone()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.moderation_repo.create_action(action).await?;

        let report = if report.status.is_terminal() {
            report
        } else {
            let mut model: moderation_report::ActiveModel = report.into();
            model.status = Set(ReportStatus::Resolved);
            self.moderation_repo.update_report(model).await?
        };

        tracing::info!(
            report_id = %report.id,
            admin = %redact_id(admin_id),
            action = input.action.as_str(),
            status = report.status.as_str(),
            "Moderation decision recorded"
        );

        Ok(report)
    }

    /// Dismiss a report without taking action.
    ///
    /// The only path to `dismissed`. Records no action row.
    pub async fn dismiss_report(
        &self,
        admin_id: &str,
        report_id: &str,
    ) -> AppResult<moderation_report::Model> {
        let report = self.moderation_repo.get_report(report_id).await?;

        if report.status.is_terminal() {
            return Err(AppError::BadRequest("Report already closed".to_string()));
        }

        let mut model: moderation_report::ActiveModel = report.into();
        model.status = Set(ReportStatus::Dismissed);

        let report = self.moderation_repo.update_report(model).await?;

        tracing::info!(
            report_id = %report.id,
            admin = %redact_id(admin_id),
            "Report dismissed"
        );

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_report(id: &str, status: ReportStatus) -> moderation_report::Model {
        moderation_report::Model {
            id: id.to_string(),
            reporter_id: Some("u1".to_string()),
            target_type: TargetType::Profile,
            target_id: "p1".to_string(),
            reason: ReportReason::Spam,
            severity: ReportSeverity::Low,
            status,
            created_at: Utc::now().into(),
        }
    }

    fn test_action(id: &str, report_id: &str, action: ActionKind) -> moderation_action::Model {
        moderation_action::Model {
            id: id.to_string(),
            report_id: report_id.to_string(),
            admin_id: "admin1".to_string(),
            action,
            created_at: Utc::now().into(),
        }
    }

    fn service_with(db: sea_orm::DatabaseConnection) -> ModerationService {
        ModerationService::new(
            ModerationRepository::new(Arc::new(db)),
            AlertService::disabled(),
            true,
        )
    }

    #[tokio::test]
    async fn test_create_report_persists_open() {
        let created = test_report("report1", ReportStatus::Open);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[created]])
            .into_connection();

        let service = service_with(db);
        let report = service
            .create_report(
                "u1",
                CreateReportInput {
                    target_type: TargetType::Profile,
                    target_id: "p1".to_string(),
                    reason: ReportReason::Spam,
                    severity: ReportSeverity::Low,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Open);
        assert_eq!(report.target_id, "p1");
    }

    #[tokio::test]
    async fn test_create_report_rejects_empty_target() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .create_report(
                "u1",
                CreateReportInput {
                    target_type: TargetType::Media,
                    target_id: "  ".to_string(),
                    reason: ReportReason::Other,
                    severity: ReportSeverity::Low,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_report_disabled() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ModerationService::new(
            ModerationRepository::new(Arc::new(db)),
            AlertService::disabled(),
            false,
        );

        let result = service
            .create_report(
                "u1",
                CreateReportInput {
                    target_type: TargetType::Profile,
                    target_id: "p1".to_string(),
                    reason: ReportReason::Spam,
                    severity: ReportSeverity::Low,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_record_decision_resolves_open_report() {
        let open = test_report("report1", ReportStatus::Open);
        let resolved = test_report("report1", ReportStatus::Resolved);
        let inserted = test_action("action1", "report1", ActionKind::Warn);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // get_report
            .append_query_results([[open]])
            // create_action insert returning
            .append_query_results([[inserted]])
            // update_report returning
            .append_query_results([[resolved]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = service_with(db);
        let report = service
            .record_decision(
                "admin1",
                RecordDecisionInput {
                    report_id: "report1".to_string(),
                    action: ActionKind::Warn,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Resolved);
    }

    #[tokio::test]
    async fn test_record_decision_on_resolved_keeps_status() {
        let resolved = test_report("report1", ReportStatus::Resolved);
        let inserted = test_action("action2", "report1", ActionKind::Warn);

        // No update query is issued for a terminal report; only the action
        // insert happens after the lookup.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resolved]])
            .append_query_results([[inserted]])
            .into_connection();

        let service = service_with(db);
        let report = service
            .record_decision(
                "admin1",
                RecordDecisionInput {
                    report_id: "report1".to_string(),
                    action: ActionKind::Warn,
                },
            )
            .await
            .unwrap();

        assert_eq!(report.status, ReportStatus::Resolved);
    }

    #[tokio::test]
    async fn test_mark_reviewing_requires_open() {
        let resolved = test_report("report1", ReportStatus::Resolved);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[resolved]])
            .into_connection();

        let service = service_with(db);
        let result = service.mark_reviewing("admin1", "report1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_dismiss_closed_report_rejected() {
        let dismissed = test_report("report1", ReportStatus::Dismissed);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[dismissed]])
            .into_connection();

        let service = service_with(db);
        let result = service.dismiss_report("admin1", "report1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_report_detail_includes_actions() {
        let report = test_report("report1", ReportStatus::Resolved);
        let actions = vec![
            test_action("action1", "report1", ActionKind::Warn),
            test_action("action2", "report1", ActionKind::Ban),
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[report]])
            .append_query_results([actions])
            .into_connection();

        let service = service_with(db);
        let detail = service.get_report_detail("report1").await.unwrap();

        assert_eq!(detail.report.id, "report1");
        assert_eq!(detail.actions.len(), 2);
    }
}
