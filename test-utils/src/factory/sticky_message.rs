//! Sticky message factory for seeding `sticky_message` rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating sticky message rows with customizable fields.
///
/// Defaults describe an enabled plain-text sticky with no live message.
pub struct StickyMessageFactory<'a> {
    db: &'a DatabaseConnection,
    channel_id: String,
    message_id: Option<String>,
    kind: String,
    title: Option<String>,
    content: String,
    color: Option<i64>,
    disabled: bool,
    error_count: i32,
}

impl<'a> StickyMessageFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - channel_id: next unique counter value
    /// - kind: `"plain"`
    /// - content: `"Sticky {id}"`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            channel_id: id.to_string(),
            message_id: None,
            kind: "plain".to_string(),
            title: None,
            content: format!("Sticky {}", id),
            color: None,
            disabled: false,
            error_count: 0,
        }
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Sets the raw `kind` column, which may be a value the application does not know.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn color(mut self, color: i64) -> Self {
        self.color = Some(color);
        self
    }

    pub fn disabled(mut self, disabled: bool, error_count: i32) -> Self {
        self.disabled = disabled;
        self.error_count = error_count;
        self
    }

    /// Builds and inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::sticky_message::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::sticky_message::Model, DbErr> {
        let now = Utc::now();
        entity::sticky_message::ActiveModel {
            channel_id: ActiveValue::Set(self.channel_id),
            message_id: ActiveValue::Set(self.message_id),
            kind: ActiveValue::Set(self.kind),
            title: ActiveValue::Set(self.title),
            content: ActiveValue::Set(self.content),
            image_url: ActiveValue::Set(None),
            color: ActiveValue::Set(self.color),
            protected: ActiveValue::Set(false),
            disabled: ActiveValue::Set(self.disabled),
            error_count: ActiveValue::Set(self.error_count),
            author_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            last_updated: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a sticky message row with default values for the given channel.
pub async fn create_sticky_message(
    db: &DatabaseConnection,
    channel_id: impl Into<String>,
) -> Result<entity::sticky_message::Model, DbErr> {
    StickyMessageFactory::new(db).channel_id(channel_id).build().await
}
