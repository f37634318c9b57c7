use sea_orm::*;

use crate::models::users::{self, CreateUser, Role, UpdateUser};

/// Insert a new user (active by default).
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    input: CreateUser,
) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        role: Set(input.role),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    new_user.insert(db).await
}

/// Fetch all users.
pub async fn get_all_users<C: ConnectionTrait>(db: &C) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(db)
        .await
}

/// Fetch a page of users ordered by id.
pub async fn get_users_paginated<C: ConnectionTrait>(
    db: &C,
    page: u64,
    limit: u64,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::Id)
        .offset((page - 1) * limit)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Look up a user by email (exact match).
pub async fn get_user_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Active sales users in their natural (id) order. Distribution hands out
/// lead blocks in exactly this order.
pub async fn get_active_sales_users<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Role.eq(Role::Sales))
        .filter(users::Column::IsActive.eq(true))
        .order_by_asc(users::Column::Id)
        .all(db)
        .await
}

/// Update an existing user (admin-level).
pub async fn update_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: UpdateUser,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
