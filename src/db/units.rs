use sea_orm::*;

use crate::models::leads;
use crate::models::units::{self, CreateUnit, UnitListQuery, UpdateUnit};

/// Insert a new unit (available by default).
pub async fn insert_unit<C: ConnectionTrait>(
    db: &C,
    input: CreateUnit,
    created_by_id: i32,
) -> Result<units::Model, DbErr> {
    let new_unit = units::ActiveModel {
        code: Set(input.code),
        location: Set(input.location),
        price: Set(input.price),
        area: Set(input.area),
        bedrooms: Set(input.bedrooms),
        bathrooms: Set(input.bathrooms),
        description: Set(input.description),
        is_available: Set(true),
        owner_id: Set(input.owner_id),
        project_id: Set(input.project_id),
        created_by_id: Set(created_by_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_unit.insert(db).await
}

/// Fetch units, optionally filtered by availability and project.
pub async fn get_units<C: ConnectionTrait>(
    db: &C,
    filter: &UnitListQuery,
) -> Result<Vec<units::Model>, DbErr> {
    let mut query = units::Entity::find();

    if let Some(available) = filter.available {
        query = query.filter(units::Column::IsAvailable.eq(available));
    }
    if let Some(project_id) = filter.project_id {
        query = query.filter(units::Column::ProjectId.eq(project_id));
    }

    query
        .order_by_desc(units::Column::CreatedAt)
        .order_by_desc(units::Column::Id)
        .all(db)
        .await
}

/// Fetch a single unit by ID.
pub async fn get_unit_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<units::Model>, DbErr> {
    units::Entity::find_by_id(id).one(db).await
}

/// Whether another unit in the same project already uses `code`.
///
/// Only applies when both code and project are present.
pub async fn unit_code_taken<C: ConnectionTrait>(
    db: &C,
    code: Option<&str>,
    project_id: Option<i32>,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let (Some(code), Some(project_id)) = (code, project_id) else {
        return Ok(false);
    };

    let mut query = units::Entity::find()
        .filter(units::Column::Code.eq(code))
        .filter(units::Column::ProjectId.eq(project_id));

    if let Some(id) = exclude_id {
        query = query.filter(units::Column::Id.ne(id));
    }

    Ok(query.count(db).await? > 0)
}

/// Update an existing unit.
pub async fn update_unit<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: UpdateUnit,
) -> Result<units::Model, DbErr> {
    let unit = units::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Unit not found".to_string()))?;

    let mut active: units::ActiveModel = unit.into();

    if let Some(code) = input.code {
        active.code = Set(Some(code));
    }
    if let Some(location) = input.location {
        active.location = Set(location);
    }
    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(area) = input.area {
        active.area = Set(area);
    }
    if let Some(bedrooms) = input.bedrooms {
        active.bedrooms = Set(bedrooms);
    }
    if let Some(bathrooms) = input.bathrooms {
        active.bathrooms = Set(bathrooms);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(owner_id) = input.owner_id {
        active.owner_id = Set(Some(owner_id));
    }
    if let Some(project_id) = input.project_id {
        active.project_id = Set(Some(project_id));
    }

    active.update(db).await
}

/// Set a unit's availability flag. Returns `None` when the unit does not exist.
pub async fn set_unit_availability<C: ConnectionTrait>(
    db: &C,
    id: i32,
    is_available: bool,
) -> Result<Option<units::Model>, DbErr> {
    let Some(unit) = units::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: units::ActiveModel = unit.into();
    active.is_available = Set(is_available);

    active.update(db).await.map(Some)
}

/// Whether any lead still references the unit.
pub async fn unit_has_leads<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let count = leads::Entity::find()
        .filter(leads::Column::UnitId.eq(id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Delete a unit by ID.
pub async fn delete_unit<C: ConnectionTrait>(db: &C, id: i32) -> Result<DeleteResult, DbErr> {
    units::Entity::delete_by_id(id).exec(db).await
}
