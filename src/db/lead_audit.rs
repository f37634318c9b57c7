//! Append-only audit tables: assignment history and status feedback.
//!
//! Nothing in here updates or deletes a row.

use sea_orm::*;

use crate::models::lead_assignment_histories as history;
use crate::models::lead_feedbacks as feedback;
use crate::models::leads::LeadStatus;

/// Append one assignment-history row.
pub async fn insert_assignment_history<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
    from_sales_id: Option<i32>,
    to_sales_id: Option<i32>,
    changed_by_id: i32,
) -> Result<history::Model, DbErr> {
    let row = history::ActiveModel {
        lead_id: Set(lead_id),
        from_sales_id: Set(from_sales_id),
        to_sales_id: Set(to_sales_id),
        changed_by_id: Set(changed_by_id),
        changed_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    row.insert(db).await
}

/// Assignment trail for a lead, oldest first.
pub async fn get_assignment_history<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
) -> Result<Vec<history::Model>, DbErr> {
    history::Entity::find()
        .filter(history::Column::LeadId.eq(lead_id))
        .order_by_asc(history::Column::ChangedAt)
        .order_by_asc(history::Column::Id)
        .all(db)
        .await
}

pub async fn count_assignment_history<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
) -> Result<u64, DbErr> {
    history::Entity::find()
        .filter(history::Column::LeadId.eq(lead_id))
        .count(db)
        .await
}

/// Append one feedback row.
pub async fn insert_feedback<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
    sales_id: i32,
    status: LeadStatus,
    comment: String,
) -> Result<feedback::Model, DbErr> {
    let row = feedback::ActiveModel {
        lead_id: Set(lead_id),
        sales_id: Set(sales_id),
        status: Set(status),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    row.insert(db).await
}

pub async fn count_feedback<C: ConnectionTrait>(db: &C, lead_id: i32) -> Result<u64, DbErr> {
    feedback::Entity::find()
        .filter(feedback::Column::LeadId.eq(lead_id))
        .count(db)
        .await
}

/// Feedback for a lead, newest first (ties broken by id, newest first).
pub async fn get_feedback_for_lead<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
) -> Result<Vec<feedback::Model>, DbErr> {
    feedback::Entity::find()
        .filter(feedback::Column::LeadId.eq(lead_id))
        .order_by_desc(feedback::Column::CreatedAt)
        .order_by_desc(feedback::Column::Id)
        .all(db)
        .await
}

/// The most recent feedback row for a lead, if any.
pub async fn get_latest_feedback<C: ConnectionTrait>(
    db: &C,
    lead_id: i32,
) -> Result<Option<feedback::Model>, DbErr> {
    feedback::Entity::find()
        .filter(feedback::Column::LeadId.eq(lead_id))
        .order_by_desc(feedback::Column::CreatedAt)
        .order_by_desc(feedback::Column::Id)
        .one(db)
        .await
}
