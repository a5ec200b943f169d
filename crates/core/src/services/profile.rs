//! Profile service with the moderated write path.
//!
//! Every profile write is scanned before it reaches storage. Under
//! `profanity_action = block` a failed scan aborts the write; under `warn`
//! the write proceeds. Either way an automatic audit report is filed,
//! best-effort.

use arbiter_common::{AppError, AppResult, IdGenerator, ModerationConfig, ProfanityAction};
use arbiter_db::{
    entities::{moderation_report::TargetType, profile},
    repositories::ProfileRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::moderation::ModerationService;
use super::scanner::{ContentScanner, ProfilePayload};

/// Input for updating a profile. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 128))]
    pub display_name: Option<String>,
    #[validate(length(max = 256))]
    pub headline: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(length(max = 128))]
    pub location: Option<String>,
    /// Replaces the stored links when present.
    #[validate(length(max = 10))]
    pub links: Option<Vec<String>>,
}

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    moderation: ModerationService,
    scanner: Arc<ContentScanner>,
    moderation_enabled: bool,
    profanity_action: ProfanityAction,
    id_gen: IdGenerator,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub fn new(
        profile_repo: ProfileRepository,
        moderation: ModerationService,
        scanner: Arc<ContentScanner>,
        config: &ModerationConfig,
    ) -> Self {
        Self {
            profile_repo,
            moderation,
            scanner,
            moderation_enabled: config.moderation_enabled,
            profanity_action: config.profanity_action,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a profile by owning user ID.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profile_repo.get_by_user(user_id).await
    }

    /// Update (or create) a profile, applying the moderation gate.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.moderation_enabled {
            let links = input.links.clone().unwrap_or_default();
            let payload = ProfilePayload {
                display_name: input.display_name.as_deref(),
                headline: input.headline.as_deref(),
                bio: input.bio.as_deref(),
                location: input.location.as_deref(),
                links: &links,
            };

            let issues = self.scanner.scan_profile_payload(&payload);
            if !issues.is_empty() {
                // Audit report is best-effort in both paths; the gate's
                // user-visible outcome never depends on it.
                if let Err(e) = self
                    .moderation
                    .file_scan_report(TargetType::Profile, user_id)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to file automatic scan report");
                }

                match self.profanity_action {
                    ProfanityAction::Block => {
                        return Err(AppError::ContentRejected(issues));
                    }
                    ProfanityAction::Warn => {
                        tracing::warn!(
                            issue_count = issues.len(),
                            "Profile write passed with scan issues (warn mode)"
                        );
                    }
                }
            }
        }

        match self.profile_repo.find_by_user(user_id).await? {
            Some(existing) => {
                let mut model: profile::ActiveModel = existing.into();
                if let Some(display_name) = input.display_name {
                    model.display_name = Set(Some(display_name));
                }
                if let Some(headline) = input.headline {
                    model.headline = Set(Some(headline));
                }
                if let Some(bio) = input.bio {
                    model.bio = Set(Some(bio));
                }
                if let Some(location) = input.location {
                    model.location = Set(Some(location));
                }
                if let Some(links) = input.links {
                    model.links = Set(serde_json::json!(links));
                }
                model.updated_at = Set(Some(chrono::Utc::now().into()));

                self.profile_repo.update(model).await
            }
            None => {
                let model = profile::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    display_name: Set(input.display_name),
                    headline: Set(input.headline),
                    bio: Set(input.bio),
                    location: Set(input.location),
                    links: Set(serde_json::json!(input.links.unwrap_or_default())),
                    created_at: Set(chrono::Utc::now().into()),
                    updated_at: Set(None),
                };

                self.profile_repo.create(model).await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::alerts::AlertService;
    use arbiter_db::entities::moderation_report::{
        self, ReportReason, ReportSeverity, ReportStatus,
    };
    use arbiter_db::repositories::ModerationRepository;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn moderating_config(action: ProfanityAction, denylist: &[&str]) -> ModerationConfig {
        ModerationConfig {
            profanity_action: action,
            profanity_denylist: denylist.iter().map(ToString::to_string).collect(),
            ..ModerationConfig::default()
        }
    }

    fn test_profile(user_id: &str) -> profile::Model {
        profile::Model {
            id: "profile1".to_string(),
            user_id: user_id.to_string(),
            display_name: Some("Alice".to_string()),
            headline: None,
            bio: None,
            location: None,
            links: serde_json::json!([]),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn scan_report(target_id: &str) -> moderation_report::Model {
        moderation_report::Model {
            id: "report1".to_string(),
            reporter_id: None,
            target_type: TargetType::Profile,
            target_id: target_id.to_string(),
            reason: ReportReason::Profanity,
            severity: ReportSeverity::Low,
            status: ReportStatus::Open,
            created_at: Utc::now().into(),
        }
    }

    fn service(
        profile_db: sea_orm::DatabaseConnection,
        moderation_db: sea_orm::DatabaseConnection,
        config: &ModerationConfig,
    ) -> ProfileService {
        let moderation = ModerationService::new(
            ModerationRepository::new(Arc::new(moderation_db)),
            AlertService::disabled(),
            config.reports_enabled,
        );
        ProfileService::new(
            ProfileRepository::new(Arc::new(profile_db)),
            moderation,
            Arc::new(ContentScanner::new(config)),
            config,
        )
    }

    fn clean_input() -> UpdateProfileInput {
        UpdateProfileInput {
            display_name: Some("A clean name".to_string()),
            headline: None,
            bio: None,
            location: None,
            links: None,
        }
    }

    fn flagged_input() -> UpdateProfileInput {
        UpdateProfileInput {
            display_name: Some("spamword central".to_string()),
            headline: None,
            bio: None,
            location: None,
            links: None,
        }
    }

    #[tokio::test]
    async fn test_clean_write_updates_existing_profile() {
        let config = moderating_config(ProfanityAction::Block, &["spamword"]);

        let profile_db = MockDatabase::new(DatabaseBackend::Postgres)
            // find_by_user
            .append_query_results([[test_profile("u1")]])
            // update returning
            .append_query_results([[test_profile("u1")]])
            .into_connection();
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(profile_db, moderation_db, &config);
        let result = service.update_profile("u1", clean_input()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_block_mode_rejects_and_files_report() {
        let config = moderating_config(ProfanityAction::Block, &["spamword"]);

        // No profile queries happen; the write is aborted before storage.
        let profile_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[scan_report("u1")]])
            .into_connection();

        let service = service(profile_db, moderation_db, &config);
        let result = service.update_profile("u1", flagged_input()).await;

        match result {
            Err(AppError::ContentRejected(issues)) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "displayName");
            }
            other => panic!("expected ContentRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_warn_mode_writes_anyway() {
        let config = moderating_config(ProfanityAction::Warn, &["spamword"]);

        let profile_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_profile("u1")]])
            .append_query_results([[test_profile("u1")]])
            .into_connection();
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[scan_report("u1")]])
            .into_connection();

        let service = service(profile_db, moderation_db, &config);
        let result = service.update_profile("u1", flagged_input()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_moderation_disabled_skips_scan() {
        let config = ModerationConfig {
            moderation_enabled: false,
            profanity_denylist: vec!["spamword".to_string()],
            ..ModerationConfig::default()
        };

        let profile_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_profile("u1")]])
            .append_query_results([[test_profile("u1")]])
            .into_connection();
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(profile_db, moderation_db, &config);
        let result = service.update_profile("u1", flagged_input()).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_block_mode_survives_report_failure() {
        let config = moderating_config(ProfanityAction::Block, &["spamword"]);

        let profile_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        // Empty mock: the report insert fails, the 422 must still come back.
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(profile_db, moderation_db, &config);
        let result = service.update_profile("u1", flagged_input()).await;

        assert!(matches!(result, Err(AppError::ContentRejected(_))));
    }

    #[tokio::test]
    async fn test_oversized_field_rejected() {
        let config = moderating_config(ProfanityAction::Block, &[]);

        let profile_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let moderation_db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = service(profile_db, moderation_db, &config);
        let input = UpdateProfileInput {
            display_name: Some("x".repeat(500)),
            headline: None,
            bio: None,
            location: None,
            links: None,
        };

        let result = service.update_profile("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
