//! Core domain services for arbiter.
//!
//! - [`ContentScanner`]: denylist text scanning and URL validation
//! - [`ModerationService`]: the report/decision workflow
//! - [`ProfileService`]: profile storage behind the moderation gate
//! - [`AlertService`]: best-effort report-created notifications
//! - [`AuthService`] / [`AdminPolicy`]: token verification and the admin
//!   capability check

pub mod services;

pub use services::alerts::AlertService;
pub use services::auth::{Actor, AdminPolicy, AuthService, Claims};
pub use services::moderation::{
    CreateReportInput, ModerationService, RecordDecisionInput, ReportDetail,
};
pub use services::profile::{ProfileService, UpdateProfileInput};
pub use services::scanner::{ContentScanner, ProfilePayload, ScanResult, UrlCheck};
