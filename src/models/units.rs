use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `units` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code: Option<String>,
    pub location: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub area: i32,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_available: bool,
    pub owner_id: Option<i32>,
    pub project_id: Option<i32>,
    pub created_by_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owners::Entity",
        from = "Column::OwnerId",
        to = "super::owners::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(has_many = "super::leads::Entity")]
    Leads,
}

impl Related<super::owners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::leads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    pub code: Option<String>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "area must be at least 1"))]
    pub area: i32,
    #[validate(range(min = 1, message = "bedrooms must be at least 1"))]
    pub bedrooms: i32,
    #[validate(range(min = 1, message = "bathrooms must be at least 1"))]
    pub bathrooms: i32,
    pub description: Option<String>,
    pub owner_id: Option<i32>,
    pub project_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnit {
    pub code: Option<String>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: Option<String>,
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 1, message = "area must be at least 1"))]
    pub area: Option<i32>,
    #[validate(range(min = 1, message = "bedrooms must be at least 1"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 1, message = "bathrooms must be at least 1"))]
    pub bathrooms: Option<i32>,
    pub description: Option<String>,
    pub owner_id: Option<i32>,
    pub project_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAvailability {
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitListQuery {
    pub available: Option<bool>,
    pub project_id: Option<i32>,
}
