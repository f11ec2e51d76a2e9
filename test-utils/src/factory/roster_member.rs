//! Roster member factory for seeding `roster_member` rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating roster member rows with customizable fields.
pub struct RosterMemberFactory<'a> {
    db: &'a DatabaseConnection,
    id: String,
    position_key: String,
    seq: i32,
    name: String,
    user_id: Option<String>,
}

impl<'a> RosterMemberFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - id: `"t{counter}"` so it never collides with generated 4-digit ids
    /// - position_key: `"recruit"`
    /// - name: `"Member {counter}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            id: format!("t{}", id),
            position_key: "recruit".to_string(),
            seq: id as i32,
            name: format!("Member {}", id),
            user_id: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the raw position key, which may be a legacy or unknown key.
    pub fn position_key(mut self, position_key: impl Into<String>) -> Self {
        self.position_key = position_key.into();
        self
    }

    pub fn seq(mut self, seq: i32) -> Self {
        self.seq = seq;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Builds and inserts the row into the database.
    pub async fn build(self) -> Result<entity::roster_member::Model, DbErr> {
        entity::roster_member::ActiveModel {
            id: ActiveValue::Set(self.id),
            position_key: ActiveValue::Set(self.position_key),
            seq: ActiveValue::Set(self.seq),
            name: ActiveValue::Set(self.name),
            user_id: ActiveValue::Set(self.user_id),
            added_by: ActiveValue::Set(None),
            added_at: ActiveValue::Set(Utc::now()),
            last_updated: ActiveValue::Set(None),
            moved_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a roster member row with default values under the given position key.
pub async fn create_roster_member(
    db: &DatabaseConnection,
    position_key: impl Into<String>,
) -> Result<entity::roster_member::Model, DbErr> {
    RosterMemberFactory::new(db)
        .position_key(position_key)
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_multiple_unique_members() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_roster_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_roster_member(db, "broker").await?;
        let second = create_roster_member(db, "broker").await?;

        assert_ne!(first.id, second.id);
        assert_eq!(first.position_key, "broker");

        Ok(())
    }
}
