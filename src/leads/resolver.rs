//! Duplicate/identity resolver.
//!
//! Best-effort matching of a phone number or name against existing leads
//! and owners. Results are warnings only; nothing here ever blocks a save,
//! and "no match" is a normal answer rather than an error.

use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;

use super::phone::normalize_phone_number;
use crate::db::leads as lead_db;
use crate::db::owners as owner_db;
use crate::error::AppError;
use crate::models::leads;
use crate::models::owners::{self, CreateOwner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Phone,
    Name,
}

/// Found/not-found payload returned by the search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch<T> {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_on: Option<MatchKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
}

impl<T> SearchMatch<T> {
    pub fn not_found() -> Self {
        Self {
            found: false,
            matched_on: None,
            record: None,
        }
    }

    fn found(kind: MatchKind, record: T) -> Self {
        Self {
            found: true,
            matched_on: Some(kind),
            record: Some(record),
        }
    }
}

/// First record whose normalized phone equals the normalized term; failing
/// that, the first whose name contains the term (case-insensitive).
///
/// `records` is scanned in the order given, so the caller's enumeration
/// order decides ties.
pub fn find_match<'a, T>(
    records: &'a [T],
    term: &str,
    phone_of: impl Fn(&T) -> Option<&str>,
    name_of: impl Fn(&T) -> &str,
) -> Option<(MatchKind, &'a T)> {
    let normalized = normalize_phone_number(term);
    if !normalized.is_empty() {
        let by_phone = records.iter().find(|record| {
            phone_of(*record).is_some_and(|phone| normalize_phone_number(phone) == normalized)
        });
        if let Some(record) = by_phone {
            return Some((MatchKind::Phone, record));
        }
    }

    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    records
        .iter()
        .find(|record| name_of(*record).to_lowercase().contains(&needle))
        .map(|record| (MatchKind::Name, record))
}

/// Look for an existing lead by phone, then by name.
pub async fn search_client(
    db: &DatabaseConnection,
    term: &str,
) -> Result<SearchMatch<leads::Model>, DbErr> {
    let all = lead_db::get_all_leads(db).await?;
    let result = find_match(
        &all,
        term,
        |lead| Some(lead.client_phone.as_str()),
        |lead| lead.client_name.as_str(),
    );

    Ok(match result {
        Some((kind, lead)) => SearchMatch::found(kind, lead.clone()),
        None => SearchMatch::not_found(),
    })
}

/// Look for an existing owner by phone, then by name.
pub async fn search_owner(
    db: &DatabaseConnection,
    term: &str,
) -> Result<SearchMatch<owners::Model>, DbErr> {
    let all = owner_db::get_all_owners(db).await?;
    let result = find_match(
        &all,
        term,
        |owner| owner.phone.as_deref(),
        |owner| owner.name.as_str(),
    );

    Ok(match result {
        Some((kind, owner)) => SearchMatch::found(kind, owner.clone()),
        None => SearchMatch::not_found(),
    })
}

/// Phone-only duplicate check used at lead intake.
pub async fn find_duplicate_lead(
    db: &DatabaseConnection,
    phone: &str,
) -> Result<Option<leads::Model>, DbErr> {
    let normalized = normalize_phone_number(phone);
    if normalized.is_empty() {
        return Ok(None);
    }

    let all = lead_db::get_all_leads(db).await?;
    Ok(all
        .into_iter()
        .find(|lead| normalize_phone_number(&lead.client_phone) == normalized))
}

/// Create an owner from the unit-entry search-or-create flow. Only the name
/// is required; phone and email are stored as given.
pub async fn add_owner(
    db: &DatabaseConnection,
    input: CreateOwner,
) -> Result<owners::Model, AppError> {
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Owner name is required"))?
        .to_string();

    let blank_to_none = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let owner = owner_db::insert_owner(
        db,
        name,
        blank_to_none(input.phone),
        blank_to_none(input.email),
    )
    .await?;

    tracing::info!(owner_id = owner.id, "owner created");
    Ok(owner)
}
