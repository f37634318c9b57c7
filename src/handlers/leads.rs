use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::authorization::{
    can_view_lead, ensure_can_reassign, require_admin, require_back_office,
};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::lead_audit;
use crate::db::leads as lead_db;
use crate::error::AppError;
use crate::leads::assignment::{self, AssignmentOutcome, DistributionMethod};
use crate::leads::tracker::{self, StatusOutcome};
use crate::leads::{export, intake};
use crate::models::PaginationQuery;
use crate::models::leads::{
    self, AssignLead, ChangeStatus, CreateLead, DistributeLeads, FollowUp, LeadListQuery,
    LeadStatus, ReassignLead, UpdateLead,
};
use crate::models::users::Role;

/// Load a lead the caller is allowed to see.
async fn visible_lead(
    user: &AuthenticatedUser,
    db: &DatabaseConnection,
    id: i32,
) -> Result<leads::Model, AppError> {
    let lead = lead_db::get_lead_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", id))?;

    if !can_view_lead(user, &lead) {
        return Err(AppError::Forbidden(
            "You can only view leads assigned to you".to_string(),
        ));
    }
    Ok(lead)
}

fn assignment_response(outcome: AssignmentOutcome) -> HttpResponse {
    match outcome {
        AssignmentOutcome::Applied { lead, history } => HttpResponse::Ok().json(serde_json::json!({
            "applied": true,
            "lead": lead,
            "history": history,
        })),
        AssignmentOutcome::LeadNotFound => HttpResponse::Ok().json(serde_json::json!({
            "applied": false,
        })),
    }
}

/// POST /api/leads: create a lead (Admin/Marketing).
pub async fn create_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateLead>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let created = intake::create_lead(db.get_ref(), body.into_inner(), user.id()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/// GET /api/leads: filtered, paginated lead list.
///
/// Sales callers only ever see leads assigned to them.
pub async fn get_leads(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    filter: web::Query<LeadListQuery>,
    page: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let owner = (user.role() == Role::Sales).then(|| user.id());
    let found = lead_db::get_leads(db.get_ref(), &filter, owner, page.page(), page.limit()).await?;
    Ok(HttpResponse::Ok().json(found))
}

/// GET /api/leads/{id}
pub async fn get_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let lead = visible_lead(&user, db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(lead))
}

/// PUT /api/leads/{id}: edit client details (Admin/Marketing).
pub async fn update_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<UpdateLead>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let updated = intake::update_lead(db.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/leads/{id}: Admin only, and only without assignment history.
pub async fn delete_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let id = path.into_inner();
    intake::delete_lead(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Lead {id} deleted"),
    })))
}

/// POST /api/leads/{id}/assign: Admin/Marketing. A missing lead is a
/// silent no-op (`applied: false`).
pub async fn assign_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<AssignLead>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let outcome =
        assignment::assign(db.get_ref(), path.into_inner(), body.sales_user_id, user.id()).await?;
    Ok(assignment_response(outcome))
}

/// POST /api/leads/{id}/reassign: `newSalesUserId: null` unassigns.
pub async fn reassign_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ReassignLead>,
) -> Result<HttpResponse, AppError> {
    change_owner(&user, db.get_ref(), path.into_inner(), body.new_sales_user_id).await
}

/// POST /api/leads/{id}/unassign
pub async fn unassign_lead(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    change_owner(&user, db.get_ref(), path.into_inner(), None).await
}

async fn change_owner(
    user: &AuthenticatedUser,
    db: &DatabaseConnection,
    lead_id: i32,
    target: Option<i32>,
) -> Result<HttpResponse, AppError> {
    require_back_office(user)?;

    let Some(lead) = lead_db::get_lead_by_id(db, lead_id).await? else {
        return Ok(assignment_response(AssignmentOutcome::LeadNotFound));
    };
    ensure_can_reassign(user.role(), &lead)?;

    let outcome = assignment::reassign(db, lead_id, target, user.id()).await?;
    Ok(assignment_response(outcome))
}

/// POST /api/leads/distribute: Admin only.
pub async fn distribute_leads(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<DistributeLeads>,
) -> Result<HttpResponse, AppError> {
    require_admin(&user)?;

    let method: DistributionMethod = body.method.parse()?;
    let summary = assignment::distribute_unassigned(db.get_ref(), method, user.id()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/leads/{id}/status
///
/// Sales callers go through the assignee-only path. Admin/Marketing go
/// through the follow-up path, with the comment as the note.
pub async fn change_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ChangeStatus>,
) -> Result<HttpResponse, AppError> {
    let lead_id = path.into_inner();
    let ChangeStatus { status, comment } = body.into_inner();

    if user.role() == Role::Sales {
        return match tracker::record_status_change(db.get_ref(), lead_id, status, user.id(), comment)
            .await?
        {
            StatusOutcome::Recorded(change) => Ok(HttpResponse::Ok().json(serde_json::json!({
                "applied": true,
                "lead": change.lead,
                "feedback": change.feedback,
                "unitSold": change.unit_sold,
            }))),
            StatusOutcome::LeadNotFound => Ok(HttpResponse::Ok().json(serde_json::json!({
                "applied": false,
            }))),
        };
    }

    let Some(lead) = lead_db::get_lead_by_id(db.get_ref(), lead_id).await? else {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "applied": false })));
    };
    if lead.current_status == status {
        return Err(AppError::InvalidTransition(format!(
            "Lead is already {status}"
        )));
    }
    if status == LeadStatus::New {
        return Err(AppError::InvalidTransition(
            "A lead cannot be moved back to New".to_string(),
        ));
    }

    let change = tracker::add_follow_up(db.get_ref(), lead_id, &comment, status, user.id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "applied": true,
        "lead": change.lead,
        "feedback": change.feedback,
        "unitSold": change.unit_sold,
    })))
}

/// POST /api/leads/{id}/follow-up: Admin/Marketing note plus status.
pub async fn follow_up(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<FollowUp>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let FollowUp { notes, status } = body.into_inner();
    let change =
        tracker::add_follow_up(db.get_ref(), path.into_inner(), &notes, status, user.id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "lead": change.lead,
        "feedback": change.feedback,
        "unitSold": change.unit_sold,
    })))
}

/// GET /api/leads/{id}/feedback: newest first.
pub async fn get_feedback(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let lead = visible_lead(&user, db.get_ref(), path.into_inner()).await?;
    let entries = tracker::feedback_history(db.get_ref(), lead.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// GET /api/leads/{id}/history: assignment trail, oldest first.
pub async fn get_history(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let id = path.into_inner();
    let history = lead_audit::get_assignment_history(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(history))
}

/// GET /api/leads/export.csv
pub async fn export_csv(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let body = export::export_leads_csv(db.get_ref()).await?;
    let filename = format!("leads-{}.csv", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(filename))
        .body(body))
}

/// GET /api/leads/summary: counts per status and per assignee.
pub async fn get_summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    require_back_office(&user)?;

    let summary = export::lead_summary(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
