use thiserror::Error;

/// Errors raised by the persistent store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Stored data exists but cannot be interpreted.
    ///
    /// Callers that favour availability treat this as an empty store.
    #[error("Stored {store} data is corrupt: {reason}")]
    Corrupt {
        /// Which snapshot failed to load (`sticky` or `roster`)
        store: &'static str,
        /// What could not be parsed
        reason: String,
    },

    /// Underlying database failure.
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl StoreError {
    pub fn corrupt(store: &'static str, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            store,
            reason: reason.into(),
        }
    }
}
