//! Shared fixtures: a migrated in-memory database and seed helpers.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use estate_crm::db::leads::{self as lead_db, NewLead};
use estate_crm::db::{projects as project_db, units as unit_db, users as user_db};
use estate_crm::models::leads;
use estate_crm::models::projects::{self, CreateProject};
use estate_crm::models::units::{self, CreateUnit};
use estate_crm::models::users::{self, CreateUser, Role, UpdateUser};

/// A fresh, fully migrated database. One connection so every query sees
/// the same in-memory schema.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, role: Role) -> users::Model {
    user_db::insert_user(
        db,
        CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role,
        },
    )
    .await
    .expect("Failed to insert user")
}

pub async fn deactivate(db: &DatabaseConnection, user_id: i32) -> users::Model {
    user_db::update_user(
        db,
        user_id,
        UpdateUser {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to deactivate user")
}

pub async fn seed_project(db: &DatabaseConnection, name: &str, admin_id: i32) -> projects::Model {
    project_db::insert_project(
        db,
        CreateProject {
            name: name.to_string(),
            location: Some("New Cairo".to_string()),
            description: None,
        },
        admin_id,
    )
    .await
    .expect("Failed to insert project")
}

pub async fn seed_unit(
    db: &DatabaseConnection,
    code: &str,
    project_id: Option<i32>,
    admin_id: i32,
) -> units::Model {
    unit_db::insert_unit(
        db,
        CreateUnit {
            code: Some(code.to_string()),
            location: "Building 4".to_string(),
            price: 2_500_000.0,
            area: 140,
            bedrooms: 3,
            bathrooms: 2,
            description: None,
            owner_id: None,
            project_id,
        },
        admin_id,
    )
    .await
    .expect("Failed to insert unit")
}

pub async fn seed_lead(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
    unit: &units::Model,
    creator_id: i32,
) -> leads::Model {
    lead_db::insert_lead(
        db,
        NewLead {
            client_name: name.to_string(),
            client_phone: phone.to_string(),
            comment: None,
            project_id: unit.project_id,
            unit_id: Some(unit.id),
            created_by_id: creator_id,
        },
    )
    .await
    .expect("Failed to insert lead")
}

/// Pin a lead's `created_at` (and `updated_at`) to a known instant.
pub async fn set_created_at(
    db: &DatabaseConnection,
    lead: leads::Model,
    at: DateTime<Utc>,
) -> leads::Model {
    let mut active: leads::ActiveModel = lead.into();
    active.created_at = Set(at);
    active.updated_at = Set(at);
    active.update(db).await.expect("Failed to pin created_at")
}

/// Fixed base instant for deterministic ordering.
pub fn minutes_after_base(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Admin, marketing, two sales reps, a project and a unit: the cast most
/// tests start from.
pub struct Fixture {
    pub admin: users::Model,
    pub marketing: users::Model,
    pub sales_a: users::Model,
    pub sales_b: users::Model,
    pub project: projects::Model,
    pub unit: units::Model,
}

pub async fn fixture(db: &DatabaseConnection) -> Fixture {
    let admin = seed_user(db, "Admin One", Role::Admin).await;
    let marketing = seed_user(db, "Marketing One", Role::Marketing).await;
    let sales_a = seed_user(db, "Sales A", Role::Sales).await;
    let sales_b = seed_user(db, "Sales B", Role::Sales).await;
    let project = seed_project(db, "Palm Hills", admin.id).await;
    let unit = seed_unit(db, "A-101", Some(project.id), admin.id).await;

    Fixture {
        admin,
        marketing,
        sales_a,
        sales_b,
        project,
        unit,
    }
}
