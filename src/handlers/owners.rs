use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::owners as owner_db;
use crate::error::AppError;
use crate::leads::resolver;
use crate::models::owners::CreateOwner;

/// GET /api/owners
pub async fn get_owners(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let owners = owner_db::get_all_owners(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(owners))
}

/// GET /api/owners/{id}
pub async fn get_owner(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let owner = owner_db::get_owner_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Owner", id))?;
    Ok(HttpResponse::Ok().json(owner))
}

/// POST /api/owners: create from the unit-entry search-or-create flow.
pub async fn create_owner(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateOwner>,
) -> Result<HttpResponse, AppError> {
    let owner = resolver::add_owner(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(owner))
}
