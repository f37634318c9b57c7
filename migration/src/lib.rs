pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_projects_table;
mod m20250301_000003_create_owners_table;
mod m20250301_000004_create_units_table;
mod m20250301_000005_create_leads_table;
mod m20250301_000006_create_lead_assignment_histories_table;
mod m20250301_000007_create_lead_feedbacks_table;
mod m20250301_000008_add_lead_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_projects_table::Migration),
            Box::new(m20250301_000003_create_owners_table::Migration),
            Box::new(m20250301_000004_create_units_table::Migration),
            Box::new(m20250301_000005_create_leads_table::Migration),
            Box::new(m20250301_000006_create_lead_assignment_histories_table::Migration),
            Box::new(m20250301_000007_create_lead_feedbacks_table::Migration),
            Box::new(m20250301_000008_add_lead_indexes::Migration),
        ]
    }
}
