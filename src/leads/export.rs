//! Reporting: the flattened CSV snapshot of all leads and the per-status /
//! per-assignee summary.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::phone::normalize_phone_number;
use crate::db::leads as lead_db;
use crate::db::projects as project_db;
use crate::db::units as unit_db;
use crate::db::users as user_db;
use crate::models::leads::{self, LeadStatus};
use crate::models::units::{self, UnitListQuery};

pub const CSV_HEADER: [&str; 12] = [
    "Id",
    "Client Name",
    "Client Phone",
    "Normalized Phone",
    "Project",
    "Unit",
    "Status",
    "Created By",
    "Assigned To",
    "Comment",
    "Created At",
    "Updated At",
];

const UNASSIGNED: &str = "Unassigned";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One lead with its relations resolved to display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadExportRow {
    pub id: i32,
    pub client_name: String,
    pub client_phone: String,
    pub comment: Option<String>,
    pub project: Option<String>,
    pub unit: Option<String>,
    pub status: LeadStatus,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wrap a free-text field in quotes, doubling embedded quotes.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render rows as CSV, most recently updated first.
pub fn render_csv(mut rows: Vec<LeadExportRow>) -> Vec<u8> {
    rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");

    for row in &rows {
        let fields = [
            row.id.to_string(),
            quoted(&row.client_name),
            quoted(&row.client_phone),
            quoted(&normalize_phone_number(&row.client_phone)),
            quoted(row.project.as_deref().unwrap_or_default()),
            quoted(row.unit.as_deref().unwrap_or_default()),
            quoted(row.status.display_name()),
            quoted(row.created_by.as_deref().unwrap_or_default()),
            quoted(row.assigned_to.as_deref().unwrap_or(UNASSIGNED)),
            quoted(row.comment.as_deref().unwrap_or_default()),
            row.created_at.format(TIMESTAMP_FORMAT).to_string(),
            row.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }

    out.into_bytes()
}

fn unit_label(unit: &units::Model) -> String {
    match &unit.code {
        Some(code) if !code.trim().is_empty() => code.clone(),
        _ => unit.location.clone(),
    }
}

/// Resolve each lead's relations against the lookup maps.
pub fn build_rows(
    all_leads: Vec<leads::Model>,
    project_names: &HashMap<i32, String>,
    unit_labels: &HashMap<i32, String>,
    user_names: &HashMap<i32, String>,
) -> Vec<LeadExportRow> {
    all_leads
        .into_iter()
        .map(|lead| LeadExportRow {
            id: lead.id,
            project: lead.project_id.and_then(|id| project_names.get(&id).cloned()),
            unit: lead.unit_id.and_then(|id| unit_labels.get(&id).cloned()),
            created_by: user_names.get(&lead.created_by_id).cloned(),
            assigned_to: lead.assigned_to_id.and_then(|id| user_names.get(&id).cloned()),
            client_name: lead.client_name,
            client_phone: lead.client_phone,
            comment: lead.comment,
            status: lead.current_status,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        })
        .collect()
}

/// Full CSV export of every lead.
pub async fn export_leads_csv(db: &DatabaseConnection) -> Result<Vec<u8>, DbErr> {
    let all_leads = lead_db::get_all_leads(db).await?;

    let project_names: HashMap<i32, String> = project_db::get_all_projects(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let unit_labels: HashMap<i32, String> = unit_db::get_units(db, &UnitListQuery::default())
        .await?
        .iter()
        .map(|u| (u.id, unit_label(u)))
        .collect();
    let user_names: HashMap<i32, String> = user_db::get_all_users(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let rows = build_rows(all_leads, &project_names, &unit_labels, &user_names);
    tracing::info!(rows = rows.len(), "lead export rendered");
    Ok(render_csv(rows))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub total: u64,
    pub unassigned: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_assignee: BTreeMap<i32, u64>,
}

/// Fold `(status, assignee)` pairs into counts.
pub fn summarize(pairs: &[(LeadStatus, Option<i32>)]) -> LeadSummary {
    let mut summary = LeadSummary::default();
    for (status, assignee) in pairs {
        summary.total += 1;
        *summary
            .by_status
            .entry(status.display_name().to_string())
            .or_insert(0) += 1;
        match assignee {
            Some(id) => *summary.by_assignee.entry(*id).or_insert(0) += 1,
            None => summary.unassigned += 1,
        }
    }
    summary
}

pub async fn lead_summary(db: &DatabaseConnection) -> Result<LeadSummary, DbErr> {
    let pairs = lead_db::get_status_assignee_pairs(db).await?;
    Ok(summarize(&pairs))
}
