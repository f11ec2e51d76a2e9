use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StickyMessage::Table)
                    .if_not_exists()
                    .col(string(StickyMessage::ChannelId).primary_key())
                    .col(string_null(StickyMessage::MessageId))
                    .col(string(StickyMessage::Kind))
                    .col(string_null(StickyMessage::Title))
                    .col(text(StickyMessage::Content))
                    .col(string_null(StickyMessage::ImageUrl))
                    .col(big_integer_null(StickyMessage::Color))
                    .col(boolean(StickyMessage::Protected).default(false))
                    .col(boolean(StickyMessage::Disabled).default(false))
                    .col(integer(StickyMessage::ErrorCount).default(0))
                    .col(string_null(StickyMessage::AuthorId))
                    .col(timestamp_with_time_zone(StickyMessage::CreatedAt))
                    .col(timestamp_with_time_zone(StickyMessage::LastUpdated))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StickyMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StickyMessage {
    Table,
    ChannelId,
    MessageId,
    Kind,
    Title,
    Content,
    ImageUrl,
    Color,
    Protected,
    Disabled,
    ErrorCount,
    AuthorId,
    CreatedAt,
    LastUpdated,
}
