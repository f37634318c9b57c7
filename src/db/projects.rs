use sea_orm::*;

use crate::models::leads;
use crate::models::projects::{self, CreateProject, UpdateProject};

/// Insert a new project.
pub async fn insert_project<C: ConnectionTrait>(
    db: &C,
    input: CreateProject,
    created_by_id: i32,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        name: Set(input.name),
        location: Set(input.location),
        description: Set(input.description),
        created_by_id: Set(created_by_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_project.insert(db).await
}

/// Fetch all projects, alphabetically.
pub async fn get_all_projects<C: ConnectionTrait>(db: &C) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .order_by_asc(projects::Column::Name)
        .all(db)
        .await
}

/// Fetch a single project by ID.
pub async fn get_project_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// Update an existing project.
pub async fn update_project<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: UpdateProject,
) -> Result<projects::Model, DbErr> {
    let project = projects::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;

    let mut active: projects::ActiveModel = project.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }

    active.update(db).await
}

/// Whether any lead still references the project.
pub async fn project_has_leads<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let count = leads::Entity::find()
        .filter(leads::Column::ProjectId.eq(id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Delete a project by ID.
pub async fn delete_project<C: ConnectionTrait>(db: &C, id: i32) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_by_id(id).exec(db).await
}
