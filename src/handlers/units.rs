use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::authorization::{require_admin, require_back_office, require_role};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::owners as owner_db;
use crate::db::projects as project_db;
use crate::db::units as unit_db;
use crate::error::AppError;
use crate::models::units::{CreateUnit, SetAvailability, UnitListQuery, UpdateUnit};
use crate::models::users::Role;

/// Reject references to projects or owners that do not exist.
async fn check_references(
    db: &DatabaseConnection,
    project_id: Option<i32>,
    owner_id: Option<i32>,
) -> Result<(), AppError> {
    if let Some(project_id) = project_id {
        if project_db::get_project_by_id(db, project_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Project {project_id} does not exist"
            )));
        }
    }
    if let Some(owner_id) = owner_id {
        if owner_db::get_owner_by_id(db, owner_id).await?.is_none() {
            return Err(AppError::validation(format!("Owner {owner_id} does not exist")));
        }
    }
    Ok(())
}

fn duplicate_code(code: Option<&str>) -> AppError {
    AppError::Conflict(format!(
        "Unit code {} is already used in this project",
        code.unwrap_or_default()
    ))
}

/// GET /api/units
/// Query params: ?available=true&projectId=3
pub async fn get_units(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<UnitListQuery>,
) -> Result<HttpResponse, AppError> {
    let units = unit_db::get_units(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(units))
}

/// GET /api/units/{id}
pub async fn get_unit(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let unit = unit_db::get_unit_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", id))?;
    Ok(HttpResponse::Ok().json(unit))
}

/// POST /api/units: any role may list a unit.
pub async fn create_unit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateUnit>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    input.validate()?;
    check_references(db.get_ref(), input.project_id, input.owner_id).await?;

    if unit_db::unit_code_taken(db.get_ref(), input.code.as_deref(), input.project_id, None)
        .await?
    {
        return Err(duplicate_code(input.code.as_deref()));
    }

    let unit = unit_db::insert_unit(db.get_ref(), input, user.id()).await?;
    tracing::info!(unit_id = unit.id, "unit created");
    Ok(HttpResponse::Created().json(unit))
}

/// PUT /api/units/{id} (Admin/Marketing)
pub async fn update_unit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateUnit>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let existing = unit_db::get_unit_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", id))?;
    check_references(db.get_ref(), input.project_id, input.owner_id).await?;

    // Uniqueness is checked against the unit as it will look after the update.
    let code = input.code.clone().or(existing.code);
    let project_id = input.project_id.or(existing.project_id);
    if unit_db::unit_code_taken(db.get_ref(), code.as_deref(), project_id, Some(id)).await? {
        return Err(duplicate_code(code.as_deref()));
    }

    let updated = unit_db::update_unit(db.get_ref(), id, input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// PUT /api/units/{id}/availability (Admin/Sales)
pub async fn set_availability(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<SetAvailability>,
) -> Result<HttpResponse, AppError> {
    require_role(&user, &[Role::Admin, Role::Sales])?;

    let id = path.into_inner();
    let unit = unit_db::set_unit_availability(db.get_ref(), id, body.is_available)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", id))?;

    tracing::info!(unit_id = id, is_available = unit.is_available, "unit availability changed");
    Ok(HttpResponse::Ok().json(unit))
}

/// DELETE /api/units/{id}: Admin only; blocked while leads reference it.
pub async fn delete_unit(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let id = path.into_inner();
    if unit_db::unit_has_leads(db.get_ref(), id).await? {
        return Err(AppError::Conflict(format!(
            "Unit {id} still has leads and cannot be deleted"
        )));
    }

    let result = unit_db::delete_unit(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Unit", id));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Unit {id} deleted"),
    })))
}
