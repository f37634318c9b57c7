//! Assignment engine: the single source of truth for who owns a lead, plus
//! the append-only trail of every ownership change.
//!
//! Role checks belong to the caller. The one rule enforced here is the
//! terminal lock: a `DoneDeal` or `Canceled` lead never changes hands.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::db::lead_audit;
use crate::db::leads as lead_db;
use crate::db::users as user_db;
use crate::error::AppError;
use crate::models::lead_assignment_histories as history;
use crate::models::leads;
use crate::models::users::Role;

/// Result of an assign/reassign call.
///
/// A missing lead is a silent no-op rather than an error so callers can
/// retry freely.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentOutcome {
    Applied {
        lead: leads::Model,
        history: history::Model,
    },
    LeadNotFound,
}

impl AssignmentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, AssignmentOutcome::Applied { .. })
    }
}

/// How unassigned leads are spread over the sales team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionMethod {
    /// Contiguous blocks of the oldest leads, one block per sales user.
    RoundRobin,
}

impl FromStr for DistributionMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roundrobin" | "round_robin" | "round-robin" => Ok(DistributionMethod::RoundRobin),
            other => Err(AppError::validation(format!(
                "Unknown distribution method '{other}'"
            ))),
        }
    }
}

/// The block of leads one sales user receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub sales_id: i32,
    pub lead_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub method: DistributionMethod,
    pub leads_distributed: usize,
    pub sales_reps: usize,
    pub allocations: Vec<Allocation>,
}

/// Split `lead_ids` (already oldest first) into contiguous blocks over
/// `sales_ids` (in their natural order).
///
/// The first `len % reps` users get one extra lead. Users whose share is
/// zero are left out of the result.
pub fn plan_block_distribution(lead_ids: &[i32], sales_ids: &[i32]) -> Vec<Allocation> {
    if lead_ids.is_empty() || sales_ids.is_empty() {
        return Vec::new();
    }

    let base = lead_ids.len() / sales_ids.len();
    let remainder = lead_ids.len() % sales_ids.len();

    let mut allocations = Vec::with_capacity(sales_ids.len());
    let mut cursor = 0;
    for (index, &sales_id) in sales_ids.iter().enumerate() {
        let share = if index < remainder { base + 1 } else { base };
        if share == 0 {
            continue;
        }
        allocations.push(Allocation {
            sales_id,
            lead_ids: lead_ids[cursor..cursor + share].to_vec(),
        });
        cursor += share;
    }

    allocations
}

/// Assign a lead to a sales user.
pub async fn assign(
    db: &DatabaseConnection,
    lead_id: i32,
    to_sales_id: i32,
    actor_id: i32,
) -> Result<AssignmentOutcome, AppError> {
    change_assignee(db, lead_id, Some(to_sales_id), actor_id).await
}

/// Move a lead to another sales user, or unassign it with `None`.
pub async fn reassign(
    db: &DatabaseConnection,
    lead_id: i32,
    new_sales_id: Option<i32>,
    actor_id: i32,
) -> Result<AssignmentOutcome, AppError> {
    change_assignee(db, lead_id, new_sales_id, actor_id).await
}

async fn change_assignee(
    db: &DatabaseConnection,
    lead_id: i32,
    target: Option<i32>,
    actor_id: i32,
) -> Result<AssignmentOutcome, AppError> {
    let txn = db.begin().await?;

    let Some(lead) = lead_db::get_lead_by_id(&txn, lead_id).await? else {
        tracing::debug!(lead_id, actor_id, "assignment skipped: lead not found");
        return Ok(AssignmentOutcome::LeadNotFound);
    };

    if lead.current_status.is_terminal() {
        tracing::info!(
            lead_id,
            actor_id,
            status = ?lead.current_status,
            "assignment rejected: lead is terminal"
        );
        return Err(AppError::TerminalLead {
            lead_id,
            status: lead.current_status,
        });
    }

    if let Some(sales_id) = target {
        ensure_active_sales_user(&txn, sales_id).await?;
    }

    let from = lead.assigned_to_id;
    let history = lead_audit::insert_assignment_history(&txn, lead.id, from, target, actor_id).await?;
    let lead = lead_db::set_assignee(&txn, lead, target).await?;

    txn.commit().await?;

    tracing::info!(lead_id, actor_id, ?from, to = ?target, "lead assignment changed");
    Ok(AssignmentOutcome::Applied { lead, history })
}

async fn ensure_active_sales_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), AppError> {
    match user_db::get_user_by_id(db, user_id).await? {
        Some(user) if user.role == Role::Sales && user.is_active => Ok(()),
        Some(_) => Err(AppError::validation(format!(
            "User {user_id} is not an active sales user"
        ))),
        None => Err(AppError::not_found("User", user_id)),
    }
}

/// Hand every unassigned, non-terminal lead to the active sales team.
///
/// All history rows and lead updates commit together; any failure rolls
/// the whole batch back.
pub async fn distribute_unassigned(
    db: &DatabaseConnection,
    method: DistributionMethod,
    actor_id: i32,
) -> Result<DistributionSummary, AppError> {
    let txn = db.begin().await?;

    let unassigned = lead_db::get_unassigned_leads_oldest_first(&txn).await?;
    let sales = user_db::get_active_sales_users(&txn).await?;

    if unassigned.is_empty() || sales.is_empty() {
        tracing::info!(
            actor_id,
            unassigned = unassigned.len(),
            sales_reps = sales.len(),
            "distribution skipped: nothing to distribute"
        );
        return Ok(DistributionSummary {
            method,
            leads_distributed: 0,
            sales_reps: 0,
            allocations: Vec::new(),
        });
    }

    let lead_ids: Vec<i32> = unassigned.iter().map(|l| l.id).collect();
    let sales_ids: Vec<i32> = sales.iter().map(|u| u.id).collect();
    let allocations = match method {
        DistributionMethod::RoundRobin => plan_block_distribution(&lead_ids, &sales_ids),
    };

    let mut pool: HashMap<i32, leads::Model> = unassigned.into_iter().map(|l| (l.id, l)).collect();
    for allocation in &allocations {
        for lead_id in &allocation.lead_ids {
            let Some(lead) = pool.remove(lead_id) else {
                continue;
            };
            lead_audit::insert_assignment_history(
                &txn,
                lead.id,
                None,
                Some(allocation.sales_id),
                actor_id,
            )
            .await?;
            lead_db::set_assignee(&txn, lead, Some(allocation.sales_id)).await?;
        }
    }

    txn.commit().await?;

    let leads_distributed = allocations.iter().map(|a| a.lead_ids.len()).sum();
    tracing::info!(
        actor_id,
        leads_distributed,
        sales_reps = allocations.len(),
        "unassigned leads distributed"
    );

    Ok(DistributionSummary {
        method,
        leads_distributed,
        sales_reps: allocations.len(),
        allocations,
    })
}
