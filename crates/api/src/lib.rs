//! HTTP API layer for arbiter.
//!
//! - **Endpoints**: reports, moderation decisions, profiles, health
//! - **Extractors**: authenticated and admin actors
//! - **Middleware**: bearer-token authentication
//! - **Rate limiting**: in-process fixed-window limiter
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

pub use endpoints::router;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};
