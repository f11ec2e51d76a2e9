use crate::{
    error::store::StoreError,
    model::{roster::RosterSnapshot, sticky::StickySnapshot},
};

/// Durable map of sticky configurations keyed by channel.
///
/// `load` returns the last saved snapshot, or an empty one when nothing was saved or the
/// stored data is corrupt. `save` replaces the whole snapshot. Callers serialise
/// `load + mutate + save`.
#[serenity::async_trait]
pub trait StickyStore: Send + Sync {
    async fn load(&self) -> Result<StickySnapshot, StoreError>;

    async fn save(&self, snapshot: &StickySnapshot) -> Result<(), StoreError>;
}

/// Durable roster keyed by position.
///
/// Same contract as `StickyStore`; the default snapshot holds every catalog position
/// with no members. `total_members` is recomputed on load and save.
#[serenity::async_trait]
pub trait RosterStore: Send + Sync {
    async fn load(&self) -> Result<RosterSnapshot, StoreError>;

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError>;
}
