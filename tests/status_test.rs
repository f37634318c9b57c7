//! Status/feedback tracker against a real (in-memory) database.
//!
//! Run with: `cargo test --test status_test`
mod common;

use estate_crm::db::leads as lead_db;
use estate_crm::db::units as unit_db;
use estate_crm::error::AppError;
use estate_crm::leads::assignment;
use estate_crm::leads::tracker::{self, StatusOutcome};
use estate_crm::models::leads::{self, LeadStatus};

use common::{Fixture, fixture, seed_lead, test_db};
use sea_orm::DatabaseConnection;

async fn assigned_lead(db: &DatabaseConnection, f: &Fixture) -> leads::Model {
    let lead = seed_lead(db, "Mona Adel", "01012345678", &f.unit, f.marketing.id).await;
    assignment::assign(db, lead.id, f.sales_a.id, f.admin.id).await.unwrap();
    lead
}

#[tokio::test]
async fn only_the_assignee_may_change_status() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    let err = tracker::record_status_change(&db, lead.id, LeadStatus::Busy, f.sales_b.id, String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    assert!(tracker::feedback_history(&db, lead.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn new_and_unchanged_statuses_are_rejected() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    let err = tracker::record_status_change(&db, lead.id, LeadStatus::New, f.sales_a.id, String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    tracker::record_status_change(&db, lead.id, LeadStatus::NoAnswer, f.sales_a.id, "Rang twice".into())
        .await
        .unwrap();
    let err = tracker::record_status_change(&db, lead.id, LeadStatus::NoAnswer, f.sales_a.id, String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    assert_eq!(tracker::feedback_history(&db, lead.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn status_change_on_missing_lead_is_a_no_op() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let outcome = tracker::record_status_change(&db, 4_242, LeadStatus::Busy, f.sales_a.id, String::new())
        .await
        .unwrap();
    assert_eq!(outcome, StatusOutcome::LeadNotFound);
}

#[tokio::test]
async fn done_deal_marks_the_unit_unavailable() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    let outcome = tracker::record_status_change(&db, lead.id, LeadStatus::DoneDeal, f.sales_a.id, "Contract signed".into())
        .await
        .unwrap();
    let StatusOutcome::Recorded(change) = outcome else {
        panic!("expected the status change to be recorded");
    };
    assert!(change.unit_sold);
    assert_eq!(change.lead.current_status, LeadStatus::DoneDeal);
    assert_eq!(change.feedback.status, LeadStatus::DoneDeal);

    let unit = unit_db::get_unit_by_id(&db, f.unit.id).await.unwrap().unwrap();
    assert!(!unit.is_available);

    // Terminal: the assignee cannot move it anywhere else.
    let err = tracker::record_status_change(&db, lead.id, LeadStatus::Potential, f.sales_a.id, String::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn other_statuses_leave_the_unit_alone() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    for status in [LeadStatus::FollowUp, LeadStatus::Potential, LeadStatus::Canceled] {
        tracker::record_status_change(&db, lead.id, status, f.sales_a.id, String::new())
            .await
            .unwrap();
    }

    let unit = unit_db::get_unit_by_id(&db, f.unit.id).await.unwrap().unwrap();
    assert!(unit.is_available);
}

#[tokio::test]
async fn feedback_is_listed_newest_first_and_drives_current_status() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    assert_eq!(tracker::current_status(&db, lead.id).await.unwrap(), Some(LeadStatus::New));

    let steps = [
        (LeadStatus::NoAnswer, "No answer"),
        (LeadStatus::FollowUp, "Call back Sunday"),
        (LeadStatus::Potential, "Wants a viewing"),
    ];
    for (status, comment) in steps {
        tracker::record_status_change(&db, lead.id, status, f.sales_a.id, comment.to_string())
            .await
            .unwrap();
    }

    let history = tracker::feedback_history(&db, lead.id).await.unwrap();
    let statuses: Vec<LeadStatus> = history.iter().map(|f| f.status).collect();
    assert_eq!(
        statuses,
        vec![LeadStatus::Potential, LeadStatus::FollowUp, LeadStatus::NoAnswer]
    );
    assert_eq!(history[0].comment, "Wants a viewing");

    assert_eq!(tracker::current_status(&db, lead.id).await.unwrap(), Some(LeadStatus::Potential));
    let stored = lead_db::get_lead_by_id(&db, lead.id).await.unwrap().unwrap();
    assert_eq!(stored.current_status, LeadStatus::Potential);

    assert_eq!(tracker::current_status(&db, 777).await.unwrap(), None);
}

#[tokio::test]
async fn follow_up_requires_notes_and_skips_the_assignee_check() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = assigned_lead(&db, &f).await;

    let err = tracker::add_follow_up(&db, lead.id, "   ", LeadStatus::Busy, f.marketing.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let change = tracker::add_follow_up(&db, lead.id, "Client travelling", LeadStatus::Busy, f.marketing.id)
        .await
        .unwrap();
    assert_eq!(change.lead.current_status, LeadStatus::Busy);
    assert_eq!(change.feedback.sales_id, f.marketing.id);

    // A plain note keeps the status.
    let change = tracker::add_follow_up(&db, lead.id, "Still travelling", LeadStatus::Busy, f.marketing.id)
        .await
        .unwrap();
    assert_eq!(change.lead.current_status, LeadStatus::Busy);

    let err = tracker::add_follow_up(&db, lead.id, "Reset", LeadStatus::New, f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let err = tracker::add_follow_up(&db, 31_337, "Nobody", LeadStatus::Busy, f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
