use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `leads` table and its columns.
#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    ClientName,
    ClientPhone,
    Comment,
    ProjectId,
    UnitId,
    CreatedById,
    AssignedToId,
    CurrentStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leads::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leads::ClientName).string_len(25).not_null())
                    .col(ColumnDef::new(Leads::ClientPhone).string().not_null())
                    .col(ColumnDef::new(Leads::Comment).text().null())
                    .col(ColumnDef::new(Leads::ProjectId).integer().null())
                    .col(ColumnDef::new(Leads::UnitId).integer().null())
                    .col(ColumnDef::new(Leads::CreatedById).integer().not_null())
                    .col(ColumnDef::new(Leads::AssignedToId).integer().null())
                    .col(
                        ColumnDef::new(Leads::CurrentStatus)
                            .string()
                            .not_null()
                            .default("new"),
                    )
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Project deletion is blocked while any lead references it.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_project_id")
                            .from(Leads::Table, Leads::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_unit_id")
                            .from(Leads::Table, Leads::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_created_by_id")
                            .from(Leads::Table, Leads::CreatedById)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_assigned_to_id")
                            .from(Leads::Table, Leads::AssignedToId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}
