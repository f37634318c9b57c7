use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::authorization::{require_admin, require_back_office};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::PaginationQuery;
use crate::models::users::{CreateUser, UpdateUser, UserResponse};

/// GET /api/users: list users with pagination (Admin).
/// Query params: ?page=1&limit=50
pub async fn get_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let users = user_db::get_users_paginated(db.get_ref(), query.page(), query.limit()).await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/users/sales: active sales users, in distribution order.
pub async fn get_sales_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let sales = user_db::get_active_sales_users(db.get_ref()).await?;
    let response: Vec<UserResponse> = sales.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/users/{id}
pub async fn get_user(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

/// POST /api/users: create a directory user (Admin).
pub async fn create_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateUser>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let input = body.into_inner();
    input.validate()?;

    if user_db::get_user_by_email(db.get_ref(), &input.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A user with email {} already exists",
            input.email
        )));
    }

    let created = user_db::insert_user(db.get_ref(), input).await?;
    tracing::info!(user_id = created.id, role = ?created.role, "user created");
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// PUT /api/users/{id}: update name, email, role or active flag (Admin).
pub async fn update_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateUser>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    if user_db::get_user_by_id(db.get_ref(), id).await?.is_none() {
        return Err(AppError::not_found("User", id));
    }
    if let Some(email) = input.email.as_deref() {
        if let Some(other) = user_db::get_user_by_email(db.get_ref(), email).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "A user with email {email} already exists"
                )));
            }
        }
    }

    let updated = user_db::update_user(db.get_ref(), id, input).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
