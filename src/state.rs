use std::sync::Arc;

use crate::service::{role_sync::RoleReconciler, roster::RosterService, sticky::StickyService};

/// Services shared by the Discord event handler and background jobs.
#[derive(Clone)]
pub struct BotState {
    /// Guild whose commands and roles the bot manages.
    pub guild_id: u64,
    /// Messages starting with this prefix are commands, not chat activity.
    pub command_prefix: String,
    pub sticky: Arc<StickyService>,
    pub roster: Arc<RosterService>,
    pub reconciler: Arc<RoleReconciler>,
}

impl BotState {
    pub fn new(
        guild_id: u64,
        command_prefix: String,
        sticky: Arc<StickyService>,
        roster: Arc<RosterService>,
        reconciler: Arc<RoleReconciler>,
    ) -> Self {
        Self {
            guild_id,
            command_prefix,
            sticky,
            roster,
            reconciler,
        }
    }
}
