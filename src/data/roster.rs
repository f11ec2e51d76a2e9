//! Roster repository backed by the `roster_member` and `roster_metadata` tables.
//!
//! Positions themselves are not stored; they come from the `PositionCatalog`. Each member
//! row carries its position key and order. Rows stored under a legacy key are loaded
//! into the position the catalog aliases it to.

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait};

use crate::{
    data::store::RosterStore,
    error::store::StoreError,
    model::{
        position::PositionCatalog,
        roster::{Member, RosterSnapshot, ROSTER_SCHEMA_VERSION},
    },
};

/// Primary key of the single metadata row.
const METADATA_ROW_ID: i32 = 1;

pub struct RosterRepository {
    db: DatabaseConnection,
    catalog: PositionCatalog,
}

impl RosterRepository {
    pub fn new(db: DatabaseConnection, catalog: PositionCatalog) -> Self {
        Self { db, catalog }
    }

    async fn load_strict(&self) -> Result<RosterSnapshot, StoreError> {
        let rows = entity::prelude::RosterMember::find()
            .order_by_asc(entity::roster_member::Column::Seq)
            .order_by_asc(entity::roster_member::Column::Id)
            .all(&self.db)
            .await?;
        let metadata = entity::prelude::RosterMetadata::find_by_id(METADATA_ROW_ID)
            .one(&self.db)
            .await?;

        let mut snapshot = RosterSnapshot::empty(&self.catalog, Utc::now());

        for row in rows {
            let key = self
                .catalog
                .resolve(&row.position_key)
                .ok_or_else(|| {
                    StoreError::corrupt(
                        "roster",
                        format!("member {} has unknown position '{}'", row.id, row.position_key),
                    )
                })?
                .to_string();

            if snapshot.contains_member_id(&row.id) {
                return Err(StoreError::corrupt(
                    "roster",
                    format!("duplicate member id {}", row.id),
                ));
            }

            let member = Member::from_entity(row)?;
            if let Some(position) = snapshot.position_mut(&key) {
                position.members.push(member);
            }
        }

        for position in &snapshot.positions {
            if position.members.len() > position.max_members {
                tracing::warn!(
                    "Position {} holds {} members but its capacity is {}",
                    position.key,
                    position.members.len(),
                    position.max_members
                );
            }
        }

        if let Some(metadata) = metadata {
            snapshot.metadata.last_updated = metadata.last_updated;
        }
        snapshot.metadata.total_members = snapshot.total_members();
        snapshot.metadata.version = ROSTER_SCHEMA_VERSION.to_string();

        Ok(snapshot)
    }
}

#[serenity::async_trait]
impl RosterStore for RosterRepository {
    /// Loads the roster.
    ///
    /// # Returns
    /// - `Ok(RosterSnapshot)` - Stored roster, or the empty catalog roster when nothing was
    ///   stored or the stored rows are corrupt
    /// - `Err(StoreError::Db)` - Database error during query
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        match self.load_strict().await {
            Ok(snapshot) => Ok(snapshot),
            Err(err @ StoreError::Corrupt { .. }) => {
                tracing::error!("Falling back to empty roster: {}", err);
                Ok(RosterSnapshot::empty(&self.catalog, Utc::now()))
            }
            Err(err) => Err(err),
        }
    }

    /// Replaces the stored roster within one transaction.
    ///
    /// Members are written in position order with their index as `seq`, and the metadata
    /// row is rewritten with a recomputed `total_members`.
    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        let mut rows = Vec::new();
        for position in &snapshot.positions {
            for (seq, member) in position.members.iter().enumerate() {
                rows.push(entity::roster_member::ActiveModel {
                    id: ActiveValue::Set(member.id.clone()),
                    position_key: ActiveValue::Set(position.key.clone()),
                    seq: ActiveValue::Set(i32::try_from(seq).unwrap_or(i32::MAX)),
                    name: ActiveValue::Set(member.name.clone()),
                    user_id: ActiveValue::Set(member.user_id.map(|id| id.to_string())),
                    added_by: ActiveValue::Set(member.added_by.map(|id| id.to_string())),
                    added_at: ActiveValue::Set(member.added_at),
                    last_updated: ActiveValue::Set(member.last_updated),
                    moved_at: ActiveValue::Set(member.moved_at),
                });
            }
        }
        let total_members = i32::try_from(rows.len()).unwrap_or(i32::MAX);

        let txn = self.db.begin().await?;

        entity::prelude::RosterMember::delete_many()
            .exec(&txn)
            .await?;
        if !rows.is_empty() {
            entity::prelude::RosterMember::insert_many(rows)
                .exec(&txn)
                .await?;
        }

        entity::prelude::RosterMetadata::delete_many()
            .exec(&txn)
            .await?;
        entity::prelude::RosterMetadata::insert(entity::roster_metadata::ActiveModel {
            id: ActiveValue::Set(METADATA_ROW_ID),
            version: ActiveValue::Set(ROSTER_SCHEMA_VERSION.to_string()),
            total_members: ActiveValue::Set(total_members),
            last_updated: ActiveValue::Set(snapshot.metadata.last_updated),
        })
        .exec(&txn)
        .await?;

        txn.commit().await?;

        Ok(())
    }
}
