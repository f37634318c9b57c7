use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Lead status stored as a lowercase snake_case string in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum LeadStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "no_answer")]
    NoAnswer,
    #[sea_orm(string_value = "follow_up")]
    FollowUp,
    #[sea_orm(string_value = "busy")]
    Busy,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "done_deal")]
    DoneDeal,
    #[sea_orm(string_value = "not_interested")]
    NotInterested,
    #[sea_orm(string_value = "wrong_number")]
    WrongNumber,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "no_budget")]
    NoBudget,
    #[sea_orm(string_value = "potential")]
    Potential,
}

impl LeadStatus {
    /// `DoneDeal` and `Canceled` freeze the lead: no further assignment
    /// changes and no further status transitions from the sales side.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeadStatus::DoneDeal | LeadStatus::Canceled)
    }

    /// Human-readable label used in exports and UI payloads.
    pub fn display_name(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::NoAnswer => "No Answer",
            LeadStatus::FollowUp => "Follow Up",
            LeadStatus::Busy => "Busy",
            LeadStatus::Canceled => "Canceled",
            LeadStatus::DoneDeal => "Done Deal",
            LeadStatus::NotInterested => "Not Interested",
            LeadStatus::WrongNumber => "Wrong Number",
            LeadStatus::Closed => "Closed",
            LeadStatus::NoBudget => "No Budget",
            LeadStatus::Potential => "Potential",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// SeaORM entity for the `leads` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_name: String,
    pub client_phone: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub project_id: Option<i32>,
    pub unit_id: Option<i32>,
    pub created_by_id: i32,
    pub assigned_to_id: Option<i32>,
    pub current_status: LeadStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id"
    )]
    Unit,
    #[sea_orm(has_many = "super::lead_assignment_histories::Entity")]
    AssignmentHistories,
    #[sea_orm(has_many = "super::lead_feedbacks::Entity")]
    Feedbacks,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::lead_assignment_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentHistories.def()
    }
}

impl Related<super::lead_feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body of `POST /api/leads`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLead {
    #[validate(custom(function = "crate::leads::intake::validate_client_name"))]
    pub client_name: String,
    #[validate(custom(function = "crate::leads::phone::validate_phone"))]
    pub client_phone: String,
    pub comment: Option<String>,
    pub unit_id: Option<i32>,
    pub project_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLead {
    #[validate(custom(function = "crate::leads::intake::validate_client_name"))]
    pub client_name: Option<String>,
    #[validate(custom(function = "crate::leads::phone::validate_phone"))]
    pub client_phone: Option<String>,
    pub comment: Option<String>,
    pub project_id: Option<i32>,
    pub unit_id: Option<i32>,
}

/// Response of `POST /api/leads`: the stored lead plus the non-blocking
/// duplicate warning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLead {
    pub id: i32,
    pub lead: Model,
    pub duplicate_warning: bool,
    pub duplicate_of: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    pub status: Option<LeadStatus>,
    pub assigned_to: Option<i32>,
    pub project_id: Option<i32>,
    pub unassigned: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignLead {
    pub sales_user_id: i32,
}

/// `newSalesUserId: null` unassigns the lead.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignLead {
    pub new_sales_user_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeLeads {
    pub method: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatus {
    pub status: LeadStatus,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub notes: String,
    pub status: LeadStatus,
}
