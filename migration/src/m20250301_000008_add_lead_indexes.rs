use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Leads {
    Table,
    AssignedToId,
    ProjectId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LeadAssignmentHistories {
    Table,
    LeadId,
}

#[derive(DeriveIden)]
enum LeadFeedbacks {
    Table,
    LeadId,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    ProjectId,
    Code,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on leads.assigned_to_id for "my leads" and the unassigned pool
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_assigned_to_id")
                    .table(Leads::Table)
                    .col(Leads::AssignedToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_leads_project_id")
                    .table(Leads::Table)
                    .col(Leads::ProjectId)
                    .to_owned(),
            )
            .await?;

        // Distribution walks unassigned leads oldest first
        manager
            .create_index(
                Index::create()
                    .name("idx_leads_created_at")
                    .table(Leads::Table)
                    .col(Leads::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lead_assignment_histories_lead_id")
                    .table(LeadAssignmentHistories::Table)
                    .col(LeadAssignmentHistories::LeadId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lead_feedbacks_lead_id")
                    .table(LeadFeedbacks::Table)
                    .col(LeadFeedbacks::LeadId)
                    .to_owned(),
            )
            .await?;

        // Non-unique: the (project_id, code) rule is checked by the application
        manager
            .create_index(
                Index::create()
                    .name("idx_units_project_id_code")
                    .table(Units::Table)
                    .col(Units::ProjectId)
                    .col(Units::Code)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_leads_assigned_to_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_leads_project_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_leads_created_at").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_lead_assignment_histories_lead_id")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_lead_feedbacks_lead_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_units_project_id_code").to_owned())
            .await?;

        Ok(())
    }
}
