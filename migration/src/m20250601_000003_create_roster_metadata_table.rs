use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RosterMetadata::Table)
                    .if_not_exists()
                    .col(integer(RosterMetadata::Id).primary_key())
                    .col(string(RosterMetadata::Version))
                    .col(integer(RosterMetadata::TotalMembers).default(0))
                    .col(timestamp_with_time_zone(RosterMetadata::LastUpdated))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RosterMetadata::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RosterMetadata {
    Table,
    Id,
    Version,
    TotalMembers,
    LastUpdated,
}
