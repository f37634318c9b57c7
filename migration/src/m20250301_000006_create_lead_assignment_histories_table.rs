use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Append-only audit trail of lead ownership changes.
#[derive(DeriveIden)]
enum LeadAssignmentHistories {
    Table,
    Id,
    LeadId,
    FromSalesId,
    ToSalesId,
    ChangedById,
    ChangedAt,
}

#[derive(DeriveIden)]
enum Leads {
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
                    .table(LeadAssignmentHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::LeadId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::FromSalesId)
                            .integer()
                            .null(),
                    )
                    // NULL means the lead was unassigned by this change.
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::ToSalesId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::ChangedById)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeadAssignmentHistories::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_assignment_histories_lead_id")
                            .from(
                                LeadAssignmentHistories::Table,
                                LeadAssignmentHistories::LeadId,
                            )
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_assignment_histories_from_sales_id")
                            .from(
                                LeadAssignmentHistories::Table,
                                LeadAssignmentHistories::FromSalesId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_assignment_histories_to_sales_id")
                            .from(
                                LeadAssignmentHistories::Table,
                                LeadAssignmentHistories::ToSalesId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_assignment_histories_changed_by_id")
                            .from(
                                LeadAssignmentHistories::Table,
                                LeadAssignmentHistories::ChangedById,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(LeadAssignmentHistories::Table)
                    .to_owned(),
            )
            .await
    }
}
