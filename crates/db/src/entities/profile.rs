//! Profile entity.
//!
//! Only the fields the moderated write path touches; the rest of the user
//! record lives with the platform backend.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user. One profile per user.
    #[sea_orm(unique)]
    pub user_id: String,
    /// Display name shown on the profile.
    pub display_name: Option<String>,
    /// Short tagline.
    pub headline: Option<String>,
    /// Free-text biography.
    pub bio: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// External links as a JSON array of URL strings.
    pub links: Json,
    /// When the profile was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the profile was last updated.
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// The profile links as plain strings.
    #[must_use]
    pub fn link_urls(&self) -> Vec<String> {
        serde_json::from_value(self.links.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
