use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RosterMember::Table)
                    .if_not_exists()
                    .col(string(RosterMember::Id).primary_key())
                    .col(string(RosterMember::PositionKey))
                    .col(integer(RosterMember::Seq))
                    .col(string(RosterMember::Name))
                    .col(string_null(RosterMember::UserId))
                    .col(string_null(RosterMember::AddedBy))
                    .col(timestamp_with_time_zone(RosterMember::AddedAt))
                    .col(timestamp_with_time_zone_null(RosterMember::LastUpdated))
                    .col(timestamp_with_time_zone_null(RosterMember::MovedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roster_member_position_key")
                    .table(RosterMember::Table)
                    .col(RosterMember::PositionKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_roster_member_position_key")
                    .table(RosterMember::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RosterMember::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RosterMember {
    Table,
    Id,
    PositionKey,
    Seq,
    Name,
    UserId,
    AddedBy,
    AddedAt,
    LastUpdated,
    MovedAt,
}
