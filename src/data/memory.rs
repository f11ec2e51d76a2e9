//! In-memory stores for service tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use chrono::Utc;

use crate::{
    data::store::{RosterStore, StickyStore},
    error::store::StoreError,
    model::{position::PositionCatalog, roster::RosterSnapshot, sticky::StickySnapshot},
};

#[derive(Default)]
pub struct MemoryStickyStore {
    snapshot: Mutex<StickySnapshot>,
    saves: AtomicUsize,
}

impl MemoryStickyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StickySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> StickySnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[serenity::async_trait]
impl StickyStore for MemoryStickyStore {
    async fn load(&self) -> Result<StickySnapshot, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: &StickySnapshot) -> Result<(), StoreError> {
        *self.snapshot.lock().unwrap() = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MemoryRosterStore {
    snapshot: Mutex<RosterSnapshot>,
}

impl MemoryRosterStore {
    pub fn new(catalog: &PositionCatalog) -> Self {
        Self::with_snapshot(RosterSnapshot::empty(catalog, Utc::now()))
    }

    pub fn with_snapshot(snapshot: RosterSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    pub fn current(&self) -> RosterSnapshot {
        self.snapshot.lock().unwrap().clone()
    }
}

#[serenity::async_trait]
impl RosterStore for MemoryRosterStore {
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        let mut stored = snapshot.clone();
        stored.metadata.total_members = stored.total_members();
        *self.snapshot.lock().unwrap() = stored;
        Ok(())
    }
}
