//! Assignment engine against a real (in-memory) database.
//!
//! Run with: `cargo test --test assignment_test`
mod common;

use estate_crm::db::lead_audit;
use estate_crm::db::leads as lead_db;
use estate_crm::error::AppError;
use estate_crm::leads::assignment::{self, AssignmentOutcome, DistributionMethod};
use estate_crm::leads::tracker;
use estate_crm::models::leads::LeadStatus;
use estate_crm::models::users::Role;

use common::{deactivate, fixture, minutes_after_base, seed_lead, seed_user, set_created_at, test_db};

#[tokio::test]
async fn assigning_a_missing_lead_is_a_silent_no_op() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let outcome = assignment::assign(&db, 9_999, f.sales_a.id, f.admin.id)
        .await
        .expect("missing lead must not be an error");

    assert_eq!(outcome, AssignmentOutcome::LeadNotFound);
    assert_eq!(lead_audit::count_assignment_history(&db, 9_999).await.unwrap(), 0);
}

#[tokio::test]
async fn every_change_appends_one_history_row_chained_by_from() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = seed_lead(&db, "Mona Adel", "01012345678", &f.unit, f.marketing.id).await;

    assignment::assign(&db, lead.id, f.sales_a.id, f.marketing.id).await.unwrap();
    assignment::reassign(&db, lead.id, Some(f.sales_b.id), f.admin.id).await.unwrap();
    assignment::reassign(&db, lead.id, Some(f.sales_a.id), f.marketing.id).await.unwrap();

    let history = lead_audit::get_assignment_history(&db, lead.id).await.unwrap();
    assert_eq!(history.len(), 3);

    assert_eq!(history[0].from_sales_id, None);
    assert_eq!(history[0].to_sales_id, Some(f.sales_a.id));
    assert_eq!(history[0].changed_by_id, f.marketing.id);

    // Each row starts where the previous one ended.
    for pair in history.windows(2) {
        assert_eq!(pair[1].from_sales_id, pair[0].to_sales_id);
    }

    let stored = lead_db::get_lead_by_id(&db, lead.id).await.unwrap().unwrap();
    assert_eq!(stored.assigned_to_id, history.last().unwrap().to_sales_id);
}

#[tokio::test]
async fn unassigning_records_a_history_row_to_nobody() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = seed_lead(&db, "Omar Hany", "01098765432", &f.unit, f.marketing.id).await;

    assignment::assign(&db, lead.id, f.sales_a.id, f.admin.id).await.unwrap();
    let outcome = assignment::reassign(&db, lead.id, None, f.admin.id).await.unwrap();

    let AssignmentOutcome::Applied { lead: updated, history } = outcome else {
        panic!("expected the unassignment to apply");
    };
    assert_eq!(updated.assigned_to_id, None);
    assert_eq!(history.from_sales_id, Some(f.sales_a.id));
    assert_eq!(history.to_sales_id, None);
}

#[tokio::test]
async fn terminal_leads_never_change_hands() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = seed_lead(&db, "Sara Nabil", "01122334455", &f.unit, f.marketing.id).await;

    assignment::assign(&db, lead.id, f.sales_a.id, f.admin.id).await.unwrap();
    tracker::record_status_change(&db, lead.id, LeadStatus::DoneDeal, f.sales_a.id, "Signed".into())
        .await
        .unwrap();

    let err = assignment::reassign(&db, lead.id, Some(f.sales_b.id), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TerminalLead { status: LeadStatus::DoneDeal, .. }));

    let err = assignment::assign(&db, lead.id, f.sales_b.id, f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TerminalLead { .. }));

    // Nothing was appended by the rejected calls.
    assert_eq!(lead_audit::count_assignment_history(&db, lead.id).await.unwrap(), 1);
    let stored = lead_db::get_lead_by_id(&db, lead.id).await.unwrap().unwrap();
    assert_eq!(stored.assigned_to_id, Some(f.sales_a.id));
}

#[tokio::test]
async fn assignment_target_must_be_an_active_sales_user() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let lead = seed_lead(&db, "Hadi Fathy", "01200000001", &f.unit, f.marketing.id).await;

    let err = assignment::assign(&db, lead.id, f.marketing.id, f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    deactivate(&db, f.sales_b.id).await;
    let err = assignment::assign(&db, lead.id, f.sales_b.id, f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(lead_audit::count_assignment_history(&db, lead.id).await.unwrap(), 0);
}

#[tokio::test]
async fn distribution_hands_out_contiguous_blocks_of_the_oldest_leads() {
    let db = test_db().await;
    let f = fixture(&db).await;
    let sales_c = seed_user(&db, "Sales C", Role::Sales).await;

    // Insert seven leads, then make the most recently inserted the oldest so
    // ordering by creation time disagrees with ordering by id.
    let mut by_age = Vec::new();
    for i in 0..7 {
        let lead = seed_lead(&db, &format!("Client {i}"), &format!("0101000000{i}"), &f.unit, f.marketing.id).await;
        let lead = set_created_at(&db, lead, minutes_after_base(60 - i as i64)).await;
        by_age.push(lead);
    }
    by_age.reverse();

    let summary = assignment::distribute_unassigned(&db, DistributionMethod::RoundRobin, f.admin.id)
        .await
        .unwrap();

    assert_eq!(summary.leads_distributed, 7);
    assert_eq!(summary.sales_reps, 3);

    let expected = [
        (f.sales_a.id, &by_age[0..3]),
        (f.sales_b.id, &by_age[3..5]),
        (sales_c.id, &by_age[5..7]),
    ];
    for (allocation, (sales_id, block)) in summary.allocations.iter().zip(expected) {
        assert_eq!(allocation.sales_id, sales_id);
        let ids: Vec<i32> = block.iter().map(|l| l.id).collect();
        assert_eq!(allocation.lead_ids, ids);

        for lead_id in &allocation.lead_ids {
            let stored = lead_db::get_lead_by_id(&db, *lead_id).await.unwrap().unwrap();
            assert_eq!(stored.assigned_to_id, Some(sales_id));

            let history = lead_audit::get_assignment_history(&db, *lead_id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].from_sales_id, None);
            assert_eq!(history[0].to_sales_id, Some(sales_id));
        }
    }
}

#[tokio::test]
async fn distribution_skips_assigned_terminal_and_inactive() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let already_owned = seed_lead(&db, "Owned", "01011111111", &f.unit, f.marketing.id).await;
    assignment::assign(&db, already_owned.id, f.sales_b.id, f.admin.id).await.unwrap();

    let canceled = seed_lead(&db, "Canceled", "01022222222", &f.unit, f.marketing.id).await;
    tracker::add_follow_up(&db, canceled.id, "Client withdrew", LeadStatus::Canceled, f.admin.id)
        .await
        .unwrap();

    let fresh = seed_lead(&db, "Fresh", "01033333333", &f.unit, f.marketing.id).await;
    deactivate(&db, f.sales_a.id).await;

    let summary = assignment::distribute_unassigned(&db, DistributionMethod::RoundRobin, f.admin.id)
        .await
        .unwrap();

    assert_eq!(summary.leads_distributed, 1);
    assert_eq!(summary.allocations.len(), 1);
    assert_eq!(summary.allocations[0].sales_id, f.sales_b.id);
    assert_eq!(summary.allocations[0].lead_ids, vec![fresh.id]);

    let canceled = lead_db::get_lead_by_id(&db, canceled.id).await.unwrap().unwrap();
    assert_eq!(canceled.assigned_to_id, None);
}

#[tokio::test]
async fn distribution_with_nothing_to_do_reports_zero() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let summary = assignment::distribute_unassigned(&db, DistributionMethod::RoundRobin, f.admin.id)
        .await
        .unwrap();

    assert_eq!(summary.leads_distributed, 0);
    assert_eq!(summary.sales_reps, 0);
    assert!(summary.allocations.is_empty());
}

#[tokio::test]
async fn failed_distribution_rolls_back_every_assignment() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let mut pool = Vec::new();
    for i in 0..3 {
        pool.push(seed_lead(&db, &format!("Pending {i}"), &format!("0102000000{i}"), &f.unit, f.marketing.id).await);
    }

    // No such user: the first history insert breaks its foreign key.
    let result = assignment::distribute_unassigned(&db, DistributionMethod::RoundRobin, 9_999).await;
    assert!(result.is_err());

    for lead in &pool {
        let stored = lead_db::get_lead_by_id(&db, lead.id).await.unwrap().unwrap();
        assert_eq!(stored.assigned_to_id, None);
        assert_eq!(lead_audit::count_assignment_history(&db, lead.id).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn distributed_lead_closed_as_a_deal_stays_with_its_rep() {
    let db = test_db().await;
    let f = fixture(&db).await;
    deactivate(&db, f.sales_b.id).await;
    let lead = seed_lead(&db, "Youssef Kamal", "01055554444", &f.unit, f.marketing.id).await;

    let summary = assignment::distribute_unassigned(&db, DistributionMethod::RoundRobin, f.admin.id)
        .await
        .unwrap();
    assert_eq!(summary.leads_distributed, 1);

    let history = lead_audit::get_assignment_history(&db, lead.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_sales_id, None);
    assert_eq!(history[0].to_sales_id, Some(f.sales_a.id));

    tracker::record_status_change(&db, lead.id, LeadStatus::FollowUp, f.sales_a.id, "Viewing booked".into())
        .await
        .unwrap();
    tracker::record_status_change(&db, lead.id, LeadStatus::DoneDeal, f.sales_a.id, "Signed".into())
        .await
        .unwrap();

    let unit = estate_crm::db::units::get_unit_by_id(&db, f.unit.id).await.unwrap().unwrap();
    assert!(!unit.is_available);

    let err = assignment::reassign(&db, lead.id, Some(f.sales_b.id), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TerminalLead { .. }));
    assert_eq!(lead_audit::count_assignment_history(&db, lead.id).await.unwrap(), 1);

    let stored = lead_db::get_lead_by_id(&db, lead.id).await.unwrap().unwrap();
    assert_eq!(stored.assigned_to_id, Some(f.sales_a.id));
    assert_eq!(stored.current_status, LeadStatus::DoneDeal);
}
