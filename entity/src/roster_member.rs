use sea_orm::entity::prelude::*;

/// A member of the organisational roster, stored under its position key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roster_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub position_key: String,
    /// Order of the member within its position.
    pub seq: i32,
    pub name: String,
    pub user_id: Option<String>,
    pub added_by: Option<String>,
    pub added_at: DateTimeUtc,
    pub last_updated: Option<DateTimeUtc>,
    pub moved_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
