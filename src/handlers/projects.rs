use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::authorization::{require_admin, require_back_office};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::projects as project_db;
use crate::error::AppError;
use crate::models::projects::{CreateProject, UpdateProject};

/// GET /api/projects
pub async fn get_projects(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let projects = project_db::get_all_projects(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// GET /api/projects/{id}
pub async fn get_project(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let project = project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(HttpResponse::Ok().json(project))
}

/// POST /api/projects (Admin/Marketing)
pub async fn create_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProject>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let input = body.into_inner();
    input.validate()?;

    let project = project_db::insert_project(db.get_ref(), input, user.id()).await?;
    Ok(HttpResponse::Created().json(project))
}

/// PUT /api/projects/{id} (Admin/Marketing)
pub async fn update_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateProject>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    if project_db::get_project_by_id(db.get_ref(), id).await?.is_none() {
        return Err(AppError::not_found("Project", id));
    }

    let updated = project_db::update_project(db.get_ref(), id, input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/projects/{id}: Admin only; blocked while leads reference it.
pub async fn delete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let id = path.into_inner();
    if project_db::project_has_leads(db.get_ref(), id).await? {
        return Err(AppError::Conflict(format!(
            "Project {id} still has leads and cannot be deleted"
        )));
    }

    let result = project_db::delete_project(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Project", id));
    }

    tracing::info!(project_id = id, "project deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Project {id} deleted"),
    })))
}
