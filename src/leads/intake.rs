//! Lead intake and back-office edits.

use sea_orm::{DatabaseConnection, TransactionTrait};
use validator::{Validate, ValidationError};

use super::resolver;
use crate::db::lead_audit;
use crate::db::leads::{self as lead_db, NewLead};
use crate::db::projects as project_db;
use crate::db::units as unit_db;
use crate::error::AppError;
use crate::models::leads::{self, CreateLead, CreatedLead, UpdateLead};

pub const MAX_CLIENT_NAME_CHARS: usize = 25;

/// Client names are required and measured without surrounding whitespace.
pub fn validate_client_name(raw: &str) -> Result<(), ValidationError> {
    let length = raw.trim().chars().count();
    if !(1..=MAX_CLIENT_NAME_CHARS).contains(&length) {
        return Err(ValidationError::new("client_name_length")
            .with_message("client name must be 1-25 characters".into()));
    }
    Ok(())
}

/// Validate and store a new lead for `actor_id`.
///
/// The unit is required and must exist. The project, when omitted, is
/// taken from the unit. A phone match against an existing lead is reported
/// in the result but never blocks the insert.
pub async fn create_lead(
    db: &DatabaseConnection,
    input: CreateLead,
    actor_id: i32,
) -> Result<CreatedLead, AppError> {
    input.validate()?;

    let unit_id = input
        .unit_id
        .ok_or_else(|| AppError::validation("A unit must be selected"))?;
    let unit = unit_db::get_unit_by_id(db, unit_id)
        .await?
        .ok_or_else(|| AppError::not_found("Unit", unit_id))?;

    let project_id = match input.project_id {
        Some(project_id) => {
            project_db::get_project_by_id(db, project_id)
                .await?
                .ok_or_else(|| AppError::not_found("Project", project_id))?;
            Some(project_id)
        }
        None => unit.project_id,
    };

    let duplicate = resolver::find_duplicate_lead(db, &input.client_phone).await?;

    let lead = lead_db::insert_lead(
        db,
        NewLead {
            client_name: input.client_name.trim().to_string(),
            client_phone: input.client_phone.trim().to_string(),
            comment: input.comment.filter(|c| !c.trim().is_empty()),
            project_id,
            unit_id: Some(unit.id),
            created_by_id: actor_id,
        },
    )
    .await?;

    let duplicate_of = duplicate.map(|d| d.id);
    if let Some(existing) = duplicate_of {
        tracing::warn!(lead_id = lead.id, existing, "lead created with a duplicate phone");
    }
    tracing::info!(lead_id = lead.id, actor_id, "lead created");

    Ok(CreatedLead {
        id: lead.id,
        lead,
        duplicate_warning: duplicate_of.is_some(),
        duplicate_of,
    })
}

/// Edit a lead's client details or its project/unit links.
pub async fn update_lead(
    db: &DatabaseConnection,
    lead_id: i32,
    mut input: UpdateLead,
) -> Result<leads::Model, AppError> {
    input.validate()?;

    let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string());
    input.client_name = trimmed(input.client_name);
    input.client_phone = trimmed(input.client_phone);
    input.comment = trimmed(input.comment);

    let lead = lead_db::get_lead_by_id(db, lead_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

    if let Some(unit_id) = input.unit_id {
        unit_db::get_unit_by_id(db, unit_id)
            .await?
            .ok_or_else(|| AppError::not_found("Unit", unit_id))?;
    }
    if let Some(project_id) = input.project_id {
        project_db::get_project_by_id(db, project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project", project_id))?;
    }

    let updated = lead_db::update_lead(db, lead, input).await?;
    tracing::info!(lead_id, "lead updated");
    Ok(updated)
}

/// Hard-delete a lead. Leads with any assignment history or feedback are
/// kept for the audit trail.
pub async fn delete_lead(db: &DatabaseConnection, lead_id: i32) -> Result<(), AppError> {
    let txn = db.begin().await?;

    if lead_db::get_lead_by_id(&txn, lead_id).await?.is_none() {
        return Err(AppError::not_found("Lead", lead_id));
    }
    if lead_audit::count_assignment_history(&txn, lead_id).await? > 0 {
        return Err(AppError::Conflict(format!(
            "Lead {lead_id} has assignment history and cannot be deleted"
        )));
    }
    if lead_audit::count_feedback(&txn, lead_id).await? > 0 {
        return Err(AppError::Conflict(format!(
            "Lead {lead_id} has recorded feedback and cannot be deleted"
        )));
    }

    lead_db::delete_lead(&txn, lead_id).await?;
    txn.commit().await?;

    tracing::info!(lead_id, "lead deleted");
    Ok(())
}
