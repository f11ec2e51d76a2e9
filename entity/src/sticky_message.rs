use sea_orm::entity::prelude::*;

/// One sticky message configuration per Discord channel.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sticky_message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub channel_id: String,
    pub message_id: Option<String>,
    /// `embed` or `plain`
    pub kind: String,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub image_url: Option<String>,
    pub color: Option<i64>,
    pub protected: bool,
    pub disabled: bool,
    pub error_count: i32,
    pub author_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
