//! Status/feedback tracker: moves a lead through its status enumeration and
//! keeps a narrative trail of why.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

use crate::db::lead_audit;
use crate::db::leads as lead_db;
use crate::db::units as unit_db;
use crate::error::AppError;
use crate::models::lead_feedbacks as feedback;
use crate::models::leads::{self, LeadStatus};

/// What a successful status write produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub lead: leads::Model,
    pub feedback: feedback::Model,
    /// The linked unit was marked unavailable by this change.
    pub unit_sold: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    Recorded(StatusChange),
    LeadNotFound,
}

/// Sales-facing status change.
///
/// Only the assignee may call it; `New`, the current status, and any move
/// out of a terminal status are rejected. A missing lead is a silent no-op.
pub async fn record_status_change(
    db: &DatabaseConnection,
    lead_id: i32,
    new_status: LeadStatus,
    actor_sales_id: i32,
    comment: String,
) -> Result<StatusOutcome, AppError> {
    let txn = db.begin().await?;

    let Some(lead) = lead_db::get_lead_by_id(&txn, lead_id).await? else {
        tracing::debug!(lead_id, actor_sales_id, "status change skipped: lead not found");
        return Ok(StatusOutcome::LeadNotFound);
    };

    if lead.assigned_to_id != Some(actor_sales_id) {
        return Err(AppError::Forbidden(
            "Only the assigned salesperson can change this lead's status".to_string(),
        ));
    }
    if new_status == LeadStatus::New {
        return Err(AppError::InvalidTransition(
            "A lead cannot be moved back to New".to_string(),
        ));
    }
    if new_status == lead.current_status {
        return Err(AppError::InvalidTransition(format!(
            "Lead is already {}",
            lead.current_status
        )));
    }
    if lead.current_status.is_terminal() {
        return Err(AppError::InvalidTransition(format!(
            "Lead is {} and its status can no longer change",
            lead.current_status
        )));
    }

    let change = apply_status(&txn, lead, new_status, actor_sales_id, comment).await?;
    txn.commit().await?;

    tracing::info!(
        lead_id,
        actor_sales_id,
        status = ?new_status,
        unit_sold = change.unit_sold,
        "lead status changed"
    );
    Ok(StatusOutcome::Recorded(change))
}

/// Back-office follow-up: adds a note and sets the status without the
/// assignee check.
///
/// Notes are required. Keeping the current status is allowed (a plain
/// note); moving a lead back to `New` is not.
pub async fn add_follow_up(
    db: &DatabaseConnection,
    lead_id: i32,
    notes: &str,
    status: LeadStatus,
    actor_id: i32,
) -> Result<StatusChange, AppError> {
    let notes = notes.trim();
    if notes.is_empty() {
        return Err(AppError::validation("Follow-up notes are required"));
    }

    let txn = db.begin().await?;

    let lead = lead_db::get_lead_by_id(&txn, lead_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", lead_id))?;

    if status == LeadStatus::New && lead.current_status != LeadStatus::New {
        return Err(AppError::InvalidTransition(
            "A lead cannot be moved back to New".to_string(),
        ));
    }

    let change = apply_status(&txn, lead, status, actor_id, notes.to_string()).await?;
    txn.commit().await?;

    tracing::info!(lead_id, actor_id, status = ?status, "follow-up recorded");
    Ok(change)
}

/// Feedback entries for a lead, newest first.
pub async fn feedback_history(
    db: &DatabaseConnection,
    lead_id: i32,
) -> Result<Vec<feedback::Model>, DbErr> {
    lead_audit::get_feedback_for_lead(db, lead_id).await
}

/// A lead's status as derived from its latest recorded transition; `New`
/// when nothing has been recorded yet. `None` when the lead does not exist.
pub async fn current_status(
    db: &DatabaseConnection,
    lead_id: i32,
) -> Result<Option<LeadStatus>, DbErr> {
    if lead_db::get_lead_by_id(db, lead_id).await?.is_none() {
        return Ok(None);
    }

    let latest = lead_audit::get_latest_feedback(db, lead_id).await?;
    Ok(Some(latest.map_or(LeadStatus::New, |f| f.status)))
}

async fn apply_status<C: ConnectionTrait>(
    txn: &C,
    lead: leads::Model,
    status: LeadStatus,
    author_id: i32,
    comment: String,
) -> Result<StatusChange, DbErr> {
    let feedback = lead_audit::insert_feedback(txn, lead.id, author_id, status, comment).await?;
    let lead = lead_db::set_status(txn, lead, status).await?;

    let mut unit_sold = false;
    if status == LeadStatus::DoneDeal {
        if let Some(unit_id) = lead.unit_id {
            unit_sold = unit_db::set_unit_availability(txn, unit_id, false)
                .await?
                .is_some();
        }
    }

    Ok(StatusChange {
        lead,
        feedback,
        unit_sold,
    })
}
