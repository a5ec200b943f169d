//! Moderation action entity.
//!
//! Actions form an append-only audit trail under a report; deleting the
//! report cascades to its actions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The decision an admin recorded against a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ActionKind {
    #[sea_orm(string_value = "allow")]
    Allow,
    #[sea_orm(string_value = "warn")]
    Warn,
    #[sea_orm(string_value = "remove")]
    Remove,
    #[sea_orm(string_value = "ban")]
    Ban,
}

impl ActionKind {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Remove => "remove",
            Self::Ban => "ban",
        }
    }
}

/// Moderation action model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_action")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The report this action was recorded against.
    pub report_id: String,
    /// The admin who recorded the decision.
    pub admin_id: String,
    /// The decision taken.
    pub action: ActionKind,
    /// When the decision was recorded.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::moderation_report::Entity",
        from = "Column::ReportId",
        to = "super::moderation_report::Column::Id",
        on_delete = "Cascade"
    )]
    ModerationReport,
}

impl Related<super::moderation_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModerationReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
