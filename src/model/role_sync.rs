//! Result types for role reconciliation.

/// Outcome of syncing one user's tracked roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Roles granted during this sync.
    pub granted: usize,
    /// Roles revoked during this sync.
    pub revoked: usize,
    /// Grant or revoke calls that failed or timed out.
    pub failed: usize,
}

impl SyncReport {
    /// Whether any role actually changed.
    pub fn changed(&self) -> bool {
        self.granted + self.revoked > 0
    }
}

/// Aggregate counters of a full reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Roster members whose guild membership was looked up successfully.
    pub checked: usize,
    /// Members whose roles had to be changed.
    pub fixed: usize,
    /// Lookups or role operations that failed.
    pub errored: usize,
    /// Tracked roles revoked from users who are not on the roster.
    pub removed: usize,
}
