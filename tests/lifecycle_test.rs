//! End-to-end lead lifecycle: intake with duplicate detection, assignment,
//! status changes, export and summary.
//!
//! Run with: `cargo test --test lifecycle_test`
mod common;

use estate_crm::error::AppError;
use estate_crm::leads::resolver::{self, MatchKind};
use estate_crm::leads::{assignment, export, intake, tracker};
use estate_crm::models::leads::{CreateLead, LeadStatus, UpdateLead};
use estate_crm::models::owners::CreateOwner;

use common::{fixture, test_db};

fn new_lead(name: &str, phone: &str, unit_id: Option<i32>) -> CreateLead {
    CreateLead {
        client_name: name.to_string(),
        client_phone: phone.to_string(),
        comment: Some("Walk-in".to_string()),
        unit_id,
        project_id: None,
    }
}

#[tokio::test]
async fn intake_validates_and_warns_on_duplicate_phone() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let first = intake::create_lead(&db, new_lead("Mona Adel", "+20 101 234 5678", Some(f.unit.id)), f.marketing.id)
        .await
        .unwrap();
    assert!(!first.duplicate_warning);
    assert_eq!(first.lead.current_status, LeadStatus::New);
    assert_eq!(first.lead.assigned_to_id, None);
    // Project is inherited from the unit.
    assert_eq!(first.lead.project_id, Some(f.project.id));

    // Same number, different formatting: stored anyway, but flagged.
    let second = intake::create_lead(&db, new_lead("Mona A.", "0101-234-5678", Some(f.unit.id)), f.marketing.id)
        .await
        .unwrap();
    assert!(second.duplicate_warning);
    assert_eq!(second.duplicate_of, Some(first.id));
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn intake_rejects_bad_input() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let too_long = "A client name well over the limit";
    let err = intake::create_lead(&db, new_lead(too_long, "01012345678", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = intake::create_lead(&db, new_lead("Short Phone", "12345", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = intake::create_lead(&db, new_lead("No Unit", "01012345678", None), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = intake::create_lead(&db, new_lead("Ghost Unit", "01012345678", Some(404)), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn leads_with_assignment_history_cannot_be_deleted() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let untouched = intake::create_lead(&db, new_lead("Draft", "01099990000", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    intake::delete_lead(&db, untouched.id).await.unwrap();

    let worked = intake::create_lead(&db, new_lead("Worked", "01099990001", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    assignment::assign(&db, worked.id, f.sales_a.id, f.admin.id).await.unwrap();

    let err = intake::delete_lead(&db, worked.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = intake::delete_lead(&db, untouched.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn updating_a_lead_keeps_status_and_owner() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let created = intake::create_lead(&db, new_lead("Omar Hany", "01098765432", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    assignment::assign(&db, created.id, f.sales_b.id, f.admin.id).await.unwrap();

    let updated = intake::update_lead(
        &db,
        created.id,
        UpdateLead {
            client_name: Some("Omar H. Hany".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.client_name, "Omar H. Hany");
    assert_eq!(updated.assigned_to_id, Some(f.sales_b.id));
    assert_eq!(updated.current_status, LeadStatus::New);
}

#[tokio::test]
async fn resolver_matches_phone_before_name_and_never_fails() {
    let db = test_db().await;
    let f = fixture(&db).await;

    intake::create_lead(&db, new_lead("Mona Adel", "01012345678", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    intake::create_lead(&db, new_lead("Karim Said", "01155556666", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();

    let hit = resolver::search_client(&db, "+20 115 555 6666").await.unwrap();
    assert!(hit.found);
    assert_eq!(hit.matched_on, Some(MatchKind::Phone));
    assert_eq!(hit.record.unwrap().client_name, "Karim Said");

    let hit = resolver::search_client(&db, "mona").await.unwrap();
    assert_eq!(hit.matched_on, Some(MatchKind::Name));

    let miss = resolver::search_client(&db, "nobody").await.unwrap();
    assert!(!miss.found);
    assert!(miss.record.is_none());

    let owner = resolver::add_owner(
        &db,
        CreateOwner {
            name: Some("Hala Mostafa".to_string()),
            phone: Some("01277778888".to_string()),
            email: Some("   ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(owner.email, None);

    let hit = resolver::search_owner(&db, "01277778888").await.unwrap();
    assert_eq!(hit.record.map(|o| o.id), Some(owner.id));

    let err = resolver::add_owner(
        &db,
        CreateOwner {
            name: Some("  ".to_string()),
            phone: None,
            email: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn full_lifecycle_is_reflected_in_export_and_summary() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let lead = intake::create_lead(&db, new_lead("Mona Adel", "01012345678", Some(f.unit.id)), f.marketing.id)
        .await
        .unwrap();
    let other = intake::create_lead(&db, new_lead("Karim Said", "01155556666", Some(f.unit.id)), f.marketing.id)
        .await
        .unwrap();

    assignment::assign(&db, lead.id, f.sales_a.id, f.marketing.id).await.unwrap();
    tracker::record_status_change(&db, lead.id, LeadStatus::FollowUp, f.sales_a.id, "Call back".into())
        .await
        .unwrap();
    tracker::record_status_change(&db, lead.id, LeadStatus::DoneDeal, f.sales_a.id, "Signed".into())
        .await
        .unwrap();

    let csv = String::from_utf8(export::export_leads_csv(&db).await.unwrap()).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], export::CSV_HEADER.join(","));

    // The deal was touched last, so it leads the export.
    assert!(lines[1].starts_with(&format!("{},", lead.id)));
    assert!(lines[1].contains("\"Done Deal\""));
    assert!(lines[1].contains("\"Sales A\""));
    assert!(lines[1].contains("\"Palm Hills\""));
    assert!(lines[1].contains("\"A-101\""));
    assert!(lines[2].starts_with(&format!("{},", other.id)));
    assert!(lines[2].contains("\"Unassigned\""));

    let summary = export::lead_summary(&db).await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.unassigned, 1);
    assert_eq!(summary.by_status.get("Done Deal"), Some(&1));
    assert_eq!(summary.by_status.get("New"), Some(&1));
    assert_eq!(summary.by_assignee.get(&f.sales_a.id), Some(&1));
}

#[tokio::test]
async fn client_names_are_trimmed_before_validation_and_storage() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let err = intake::create_lead(&db, new_lead("    ", "01012345678", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // 25 characters plus padding fits once trimmed.
    let padded = format!("  {}  ", "N".repeat(25));
    let created = intake::create_lead(&db, new_lead(&padded, "01012345678", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    assert_eq!(created.lead.client_name, "N".repeat(25));

    let err = intake::update_lead(
        &db,
        created.id,
        UpdateLead {
            client_name: Some("   ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let updated = intake::update_lead(
        &db,
        created.id,
        UpdateLead {
            client_name: Some("  Nadia Fouad ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.client_name, "Nadia Fouad");
}

#[tokio::test]
async fn blank_comment_clears_and_no_op_edits_keep_updated_at() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let created = intake::create_lead(&db, new_lead("Omar Hany", "01098765432", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    assert_eq!(created.lead.comment.as_deref(), Some("Walk-in"));

    // Same values, only padded: nothing changes.
    let unchanged = intake::update_lead(
        &db,
        created.id,
        UpdateLead {
            client_name: Some(" Omar Hany ".to_string()),
            comment: Some("Walk-in  ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(unchanged.updated_at, created.lead.updated_at);

    let cleared = intake::update_lead(
        &db,
        created.id,
        UpdateLead {
            comment: Some("   ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(cleared.comment, None);
    assert!(cleared.updated_at >= created.lead.updated_at);
}

#[tokio::test]
async fn leads_with_feedback_cannot_be_deleted() {
    let db = test_db().await;
    let f = fixture(&db).await;

    let created = intake::create_lead(&db, new_lead("Sara Nabil", "01122334455", Some(f.unit.id)), f.admin.id)
        .await
        .unwrap();
    tracker::add_follow_up(&db, created.id, "Asked for brochure", LeadStatus::FollowUp, f.marketing.id)
        .await
        .unwrap();

    let err = intake::delete_lead(&db, created.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(tracker::feedback_history(&db, created.id).await.unwrap().len(), 1);
}
