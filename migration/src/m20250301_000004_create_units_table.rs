use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `units` table and its columns.
#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
    Code,
    Location,
    Price,
    Area,
    Bedrooms,
    Bathrooms,
    Description,
    IsAvailable,
    OwnerId,
    ProjectId,
    CreatedById,
    CreatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Owners {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
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
        // (code, project_id) uniqueness is enforced by the application, not the schema.
        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Units::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Units::Code).string().null())
                    .col(ColumnDef::new(Units::Location).string().not_null())
                    .col(ColumnDef::new(Units::Price).double().not_null())
                    .col(ColumnDef::new(Units::Area).integer().not_null())
                    .col(ColumnDef::new(Units::Bedrooms).integer().not_null())
                    .col(ColumnDef::new(Units::Bathrooms).integer().not_null())
                    .col(ColumnDef::new(Units::Description).text().null())
                    .col(
                        ColumnDef::new(Units::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Units::OwnerId).integer().null())
                    .col(ColumnDef::new(Units::ProjectId).integer().null())
                    .col(ColumnDef::new(Units::CreatedById).integer().not_null())
                    .col(
                        ColumnDef::new(Units::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_owner_id")
                            .from(Units::Table, Units::OwnerId)
                            .to(Owners::Table, Owners::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_project_id")
                            .from(Units::Table, Units::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_units_created_by_id")
                            .from(Units::Table, Units::CreatedById)
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
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await
    }
}
