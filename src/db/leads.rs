use sea_orm::*;

use crate::models::leads::{self, LeadListQuery, LeadStatus, UpdateLead};

/// Column values for a lead about to be inserted. Always starts `New` and
/// unassigned.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub client_name: String,
    pub client_phone: String,
    pub comment: Option<String>,
    pub project_id: Option<i32>,
    pub unit_id: Option<i32>,
    pub created_by_id: i32,
}

/// Insert a new lead.
pub async fn insert_lead<C: ConnectionTrait>(
    db: &C,
    input: NewLead,
) -> Result<leads::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_lead = leads::ActiveModel {
        client_name: Set(input.client_name),
        client_phone: Set(input.client_phone),
        comment: Set(input.comment),
        project_id: Set(input.project_id),
        unit_id: Set(input.unit_id),
        created_by_id: Set(input.created_by_id),
        assigned_to_id: Set(None),
        current_status: Set(LeadStatus::New),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_lead.insert(db).await
}

/// Fetch a single lead by ID.
pub async fn get_lead_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<leads::Model>, DbErr> {
    leads::Entity::find_by_id(id).one(db).await
}

/// Fetch a filtered page of leads, most recently touched first.
///
/// `owner` restricts the result to leads assigned to that user regardless
/// of the other filters (the sales view).
pub async fn get_leads<C: ConnectionTrait>(
    db: &C,
    filter: &LeadListQuery,
    owner: Option<i32>,
    page: u64,
    limit: u64,
) -> Result<Vec<leads::Model>, DbErr> {
    let mut query = leads::Entity::find();

    if let Some(status) = filter.status {
        query = query.filter(leads::Column::CurrentStatus.eq(status));
    }
    if let Some(project_id) = filter.project_id {
        query = query.filter(leads::Column::ProjectId.eq(project_id));
    }
    if let Some(assigned_to) = filter.assigned_to {
        query = query.filter(leads::Column::AssignedToId.eq(assigned_to));
    }
    if filter.unassigned == Some(true) {
        query = query.filter(leads::Column::AssignedToId.is_null());
    }
    if let Some(owner) = owner {
        query = query.filter(leads::Column::AssignedToId.eq(owner));
    }

    query
        .order_by_desc(leads::Column::UpdatedAt)
        .order_by_desc(leads::Column::Id)
        .offset((page - 1) * limit)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch every lead in natural (id) order.
pub async fn get_all_leads<C: ConnectionTrait>(db: &C) -> Result<Vec<leads::Model>, DbErr> {
    leads::Entity::find()
        .order_by_asc(leads::Column::Id)
        .all(db)
        .await
}

/// Unassigned, non-terminal leads, oldest first (ties broken by id).
pub async fn get_unassigned_leads_oldest_first<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<leads::Model>, DbErr> {
    leads::Entity::find()
        .filter(leads::Column::AssignedToId.is_null())
        .filter(
            leads::Column::CurrentStatus.is_not_in([LeadStatus::DoneDeal, LeadStatus::Canceled]),
        )
        .order_by_asc(leads::Column::CreatedAt)
        .order_by_asc(leads::Column::Id)
        .all(db)
        .await
}

/// Update the editable lead fields (not status, not assignee).
///
/// A blank comment clears it. `updated_at` only moves when a field
/// actually changes.
pub async fn update_lead<C: ConnectionTrait>(
    db: &C,
    lead: leads::Model,
    input: UpdateLead,
) -> Result<leads::Model, DbErr> {
    let mut active: leads::ActiveModel = lead.clone().into();
    let mut changed = false;

    if let Some(client_name) = input.client_name.filter(|v| *v != lead.client_name) {
        active.client_name = Set(client_name);
        changed = true;
    }
    if let Some(client_phone) = input.client_phone.filter(|v| *v != lead.client_phone) {
        active.client_phone = Set(client_phone);
        changed = true;
    }
    let comment = input
        .comment
        .map(|c| Some(c).filter(|c| !c.trim().is_empty()));
    if let Some(comment) = comment.filter(|c| *c != lead.comment) {
        active.comment = Set(comment);
        changed = true;
    }
    if let Some(project_id) = input.project_id.filter(|id| lead.project_id != Some(*id)) {
        active.project_id = Set(Some(project_id));
        changed = true;
    }
    if let Some(unit_id) = input.unit_id.filter(|id| lead.unit_id != Some(*id)) {
        active.unit_id = Set(Some(unit_id));
        changed = true;
    }

    if !changed {
        return Ok(lead);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Point the lead at a new assignee (or none) and bump `updated_at`.
pub async fn set_assignee<C: ConnectionTrait>(
    db: &C,
    lead: leads::Model,
    assigned_to_id: Option<i32>,
) -> Result<leads::Model, DbErr> {
    let mut active: leads::ActiveModel = lead.into();
    active.assigned_to_id = Set(assigned_to_id);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Set the lead's current status and bump `updated_at`.
pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    lead: leads::Model,
    status: LeadStatus,
) -> Result<leads::Model, DbErr> {
    let mut active: leads::ActiveModel = lead.into();
    active.current_status = Set(status);
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// `(current_status, assigned_to_id)` for every lead, in one query.
pub async fn get_status_assignee_pairs<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(LeadStatus, Option<i32>)>, DbErr> {
    leads::Entity::find()
        .select_only()
        .column(leads::Column::CurrentStatus)
        .column(leads::Column::AssignedToId)
        .into_tuple()
        .all(db)
        .await
}

/// Delete a lead by ID.
pub async fn delete_lead<C: ConnectionTrait>(db: &C, id: i32) -> Result<DeleteResult, DbErr> {
    leads::Entity::delete_by_id(id).exec(db).await
}
