//! Moderation repository for reports and recorded actions.

use std::sync::Arc;

use crate::entities::{
    ModerationAction, ModerationReport, moderation_action,
    moderation_report::{self, ReportSeverity, ReportStatus},
};
use arbiter_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Moderation repository for database operations.
#[derive(Clone)]
pub struct ModerationRepository {
    db: Arc<DatabaseConnection>,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ========== Reports ==========

    /// Create a new moderation report.
    pub async fn create_report(
        &self,
        model: moderation_report::ActiveModel,
    ) -> AppResult<moderation_report::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a report by ID.
    pub async fn get_report(&self, id: &str) -> AppResult<moderation_report::Model> {
        ModerationReport::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Get reports with optional status/severity filters, newest first.
    pub async fn get_reports(
        &self,
        status: Option<ReportStatus>,
        severity: Option<ReportSeverity>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<moderation_report::Model>> {
        let mut query =
            ModerationReport::find().order_by_desc(moderation_report::Column::CreatedAt);

        if let Some(s) = status {
            query = query.filter(moderation_report::Column::Status.eq(s));
        }
        if let Some(s) = severity {
            query = query.filter(moderation_report::Column::Severity.eq(s));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a report.
    pub async fn update_report(
        &self,
        model: moderation_report::ActiveModel,
    ) -> AppResult<moderation_report::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count reports with status `open`.
    pub async fn count_open_reports(&self) -> AppResult<u64> {
        ModerationReport::find()
            .filter(moderation_report::Column::Status.eq(ReportStatus::Open))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Actions ==========

    /// Record a new action against a report.
    pub async fn create_action(
        &self,
        model: moderation_action::ActiveModel,
    ) -> AppResult<moderation_action::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the action history for a report, oldest first.
    pub async fn get_actions_for_report(
        &self,
        report_id: &str,
    ) -> AppResult<Vec<moderation_action::Model>> {
        ModerationAction::find()
            .filter(moderation_action::Column::ReportId.eq(report_id))
            .order_by_asc(moderation_action::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::moderation_report::{ReportReason, TargetType};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, target_id: &str) -> moderation_report::Model {
        moderation_report::Model {
            id: id.to_string(),
            reporter_id: Some("u1".to_string()),
            target_type: TargetType::Profile,
            target_id: target_id.to_string(),
            reason: ReportReason::Spam,
            severity: ReportSeverity::Low,
            status: ReportStatus::Open,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_report() {
        let report = create_test_report("report1", "p1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report.clone()]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.get_report("report1").await.unwrap();

        assert_eq!(result.id, "report1");
        assert_eq!(result.status, ReportStatus::Open);
    }

    #[tokio::test]
    async fn test_get_report_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<moderation_report::Model>::new()])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.get_report("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_reports_filtered() {
        let report1 = create_test_report("report1", "p1");
        let report2 = create_test_report("report2", "p2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report1, report2]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo
            .get_reports(Some(ReportStatus::Open), None, 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_actions_for_report() {
        use crate::entities::moderation_action::ActionKind;

        let action = moderation_action::Model {
            id: "action1".to_string(),
            report_id: "report1".to_string(),
            admin_id: "admin1".to_string(),
            action: ActionKind::Warn,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[action]])
                .into_connection(),
        );

        let repo = ModerationRepository::new(db);
        let result = repo.get_actions_for_report("report1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].action, ActionKind::Warn);
    }
}
