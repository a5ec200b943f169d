//! Common utilities and shared types for arbiter.
//!
//! This crate provides foundational components used across all arbiter crates:
//!
//! - **Configuration**: Application settings via [`Config`] and the platform
//!   moderation flags via [`ModerationConfig`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Log redaction**: PII masking helpers for log output
//!
//! # Example
//!
//! ```no_run
//! use arbiter_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod redact;

pub use config::{Config, ModerationConfig, ProfanityAction};
pub use error::{AppError, AppResult, FieldIssue};
pub use id::IdGenerator;
pub use redact::{redact_id, redact_text};
