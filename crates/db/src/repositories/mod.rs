//! Database repositories.

mod moderation;
mod profile;

pub use moderation::ModerationRepository;
pub use profile::ProfileRepository;
