use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum LeadFeedbacks {
    Table,
    Id,
    LeadId,
    SalesId,
    Status,
    Comment,
    CreatedAt,
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
                    .table(LeadFeedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeadFeedbacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeadFeedbacks::LeadId).integer().not_null())
                    .col(ColumnDef::new(LeadFeedbacks::SalesId).integer().not_null())
                    .col(ColumnDef::new(LeadFeedbacks::Status).string().not_null())
                    .col(ColumnDef::new(LeadFeedbacks::Comment).text().not_null())
                    .col(
                        ColumnDef::new(LeadFeedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_feedbacks_lead_id")
                            .from(LeadFeedbacks::Table, LeadFeedbacks::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lead_feedbacks_sales_id")
                            .from(LeadFeedbacks::Table, LeadFeedbacks::SalesId)
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
            .drop_table(Table::drop().table(LeadFeedbacks::Table).to_owned())
            .await
    }
}
