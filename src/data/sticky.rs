//! Sticky message repository backed by the `sticky_message` table.

use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait,
};

use crate::{
    data::store::StickyStore,
    error::store::StoreError,
    model::sticky::{StickyBody, StickyConfig, StickySnapshot},
};

/// Stores every sticky configuration as one row per channel.
pub struct StickyRepository {
    db: DatabaseConnection,
}

impl StickyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads every row, failing on the first one that cannot be interpreted.
    async fn load_strict(&self) -> Result<StickySnapshot, StoreError> {
        let rows = entity::prelude::StickyMessage::find()
            .order_by_asc(entity::sticky_message::Column::ChannelId)
            .all(&self.db)
            .await?;

        let mut snapshot = StickySnapshot::default();
        for row in rows {
            snapshot.insert(StickyConfig::from_entity(row)?);
        }

        Ok(snapshot)
    }
}

fn to_active_model(config: &StickyConfig) -> entity::sticky_message::ActiveModel {
    let (title, content, image_url, color) = match &config.body {
        StickyBody::Rich {
            title,
            description,
            image_url,
            color,
        } => (
            Some(title.clone()),
            description.clone(),
            image_url.clone(),
            Some(i64::from(*color)),
        ),
        StickyBody::Plain { text, image_url } => (None, text.clone(), image_url.clone(), None),
    };

    entity::sticky_message::ActiveModel {
        channel_id: ActiveValue::Set(config.channel_id.to_string()),
        message_id: ActiveValue::Set(config.message_id.map(|id| id.to_string())),
        kind: ActiveValue::Set(config.body.kind().as_str().to_string()),
        title: ActiveValue::Set(title),
        content: ActiveValue::Set(content),
        image_url: ActiveValue::Set(image_url),
        color: ActiveValue::Set(color),
        protected: ActiveValue::Set(config.protected),
        disabled: ActiveValue::Set(config.disabled),
        error_count: ActiveValue::Set(i32::try_from(config.error_count).unwrap_or(i32::MAX)),
        author_id: ActiveValue::Set(config.author_id.map(|id| id.to_string())),
        created_at: ActiveValue::Set(config.created_at),
        last_updated: ActiveValue::Set(config.last_updated),
    }
}

#[serenity::async_trait]
impl StickyStore for StickyRepository {
    /// Loads every sticky configuration.
    ///
    /// # Returns
    /// - `Ok(StickySnapshot)` - Stored configurations, or an empty snapshot when the
    ///   stored rows are corrupt
    /// - `Err(StoreError::Db)` - Database error during query
    async fn load(&self) -> Result<StickySnapshot, StoreError> {
        match self.load_strict().await {
            Ok(snapshot) => Ok(snapshot),
            Err(err @ StoreError::Corrupt { .. }) => {
                tracing::error!("Falling back to empty sticky store: {}", err);
                Ok(StickySnapshot::default())
            }
            Err(err) => Err(err),
        }
    }

    /// Replaces every stored sticky configuration within one transaction.
    async fn save(&self, snapshot: &StickySnapshot) -> Result<(), StoreError> {
        let txn = self.db.begin().await?;

        entity::prelude::StickyMessage::delete_many()
            .exec(&txn)
            .await?;

        if !snapshot.channels.is_empty() {
            entity::prelude::StickyMessage::insert_many(
                snapshot.channels.values().map(to_active_model),
            )
            .exec(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(())
    }
}
