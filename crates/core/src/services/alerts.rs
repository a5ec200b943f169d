//! Best-effort moderation alerts.
//!
//! Delivery is fire-and-forget: the request path never waits on it and a
//! failed delivery is logged, never surfaced.

use arbiter_common::ModerationConfig;
use arbiter_db::entities::moderation_report;
use serde_json::json;

/// Delivers report-created alerts to a webhook endpoint.
#[derive(Clone)]
pub struct AlertService {
    enabled: bool,
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl AlertService {
    /// Create an alert service from the moderation flags.
    #[must_use]
    pub fn new(config: &ModerationConfig) -> Self {
        Self {
            enabled: config.moderation_alerts_enabled,
            webhook_url: config.moderation_alert_webhook_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// An alert service that never delivers anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            webhook_url: None,
            client: reqwest::Client::new(),
        }
    }

    /// Announce a newly created report.
    ///
    /// Spawns the delivery and returns immediately. The payload identifies
    /// the report and target but never the reporter.
    pub fn notify_report_created(&self, report: &moderation_report::Model) {
        if !self.enabled {
            return;
        }
        let Some(url) = self.webhook_url.clone() else {
            tracing::warn!("Moderation alerts enabled but no webhook URL configured");
            return;
        };

        let payload = json!({
            "event": "report.created",
            "reportId": report.id,
            "targetType": report.target_type.as_str(),
            "targetId": report.target_id,
            "reason": report.reason.as_str(),
            "severity": report.severity.as_str(),
            "createdAt": report.created_at.to_rfc3339(),
        });

        let client = self.client.clone();
        let report_id = report.id.clone();

        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(report_id = %report_id, "Moderation alert delivered");
                }
                Ok(resp) => {
                    tracing::warn!(
                        report_id = %report_id,
                        status = %resp.status(),
                        "Moderation alert delivery failed"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        report_id = %report_id,
                        error = %e,
                        "Moderation alert delivery failed"
                    );
                }
            }
        });
    }
}
