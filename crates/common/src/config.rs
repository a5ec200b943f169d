//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Authentication configuration.
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to verify bearer tokens issued by the platform.
    pub token_secret: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `ARBITER_ENV`)
    /// 3. Environment variables with `ARBITER` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("ARBITER_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ARBITER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("ARBITER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// What to do when a profile write fails the profanity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfanityAction {
    /// Abort the write and surface the issues to the caller.
    #[default]
    Block,
    /// Let the write proceed and only file the audit report.
    Warn,
}

/// Platform moderation flags.
///
/// Resolved once at startup from the documented environment variables
/// (`MODERATION_ENABLED`, `REPORTS_ENABLED`, `MODERATION_STRICT_MODE`,
/// `PROFANITY_ACTION`, `MODERATION_ALERTS_ENABLED`,
/// `MODERATION_ALERT_WEBHOOK_URL`, `URL_ALLOWED_DOMAINS`, `ADMIN_ROLE_IDS`,
/// `PROFANITY_DENYLIST`). List-valued flags are comma-separated.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Whether profile writes are scanned at all.
    pub moderation_enabled: bool,
    /// Whether user report submission is accepted.
    pub reports_enabled: bool,
    /// Whether URL validation requires an allowlisted domain.
    pub moderation_strict_mode: bool,
    /// Block or warn on a failed profile scan.
    pub profanity_action: ProfanityAction,
    /// Whether report-created alerts are delivered.
    pub moderation_alerts_enabled: bool,
    /// Webhook endpoint for report-created alerts.
    pub moderation_alert_webhook_url: Option<String>,
    /// Domains accepted by URL validation in strict mode.
    pub url_allowed_domains: Vec<String>,
    /// Role IDs granted admin capabilities.
    pub admin_role_ids: Vec<String>,
    /// Denylisted terms matched as whole tokens.
    pub profanity_denylist: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            moderation_enabled: true,
            reports_enabled: true,
            moderation_strict_mode: false,
            profanity_action: ProfanityAction::Block,
            moderation_alerts_enabled: false,
            moderation_alert_webhook_url: None,
            url_allowed_domains: Vec::new(),
            admin_role_ids: Vec::new(),
            profanity_denylist: Vec::new(),
        }
    }
}

impl ModerationConfig {
    /// Resolve the moderation flags from the process environment.
    ///
    /// Services receive this struct; nothing else reads these variables.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("url_allowed_domains")
                    .with_list_parse_key("admin_role_ids")
                    .with_list_parse_key("profanity_denylist"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_defaults() {
        let config = ModerationConfig::default();

        assert!(config.moderation_enabled);
        assert!(config.reports_enabled);
        assert!(!config.moderation_strict_mode);
        assert_eq!(config.profanity_action, ProfanityAction::Block);
        assert!(config.url_allowed_domains.is_empty());
    }

    #[test]
    fn test_profanity_action_parses_lowercase() {
        let action: ProfanityAction = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(action, ProfanityAction::Warn);

        let action: ProfanityAction = serde_json::from_str("\"block\"").unwrap();
        assert_eq!(action, ProfanityAction::Block);
    }
}
