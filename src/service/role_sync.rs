//! Role reconciler for the roster.
//!
//! Derives the one tracked role each roster member should hold from their position and
//! drives the guild towards that state. Every grant and revoke is checked against the
//! roles the user already holds, so repeated syncs are no-ops, and every call is
//! independent: one failed call never stops the others.

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    data::store::RosterStore,
    error::{platform::PlatformError, role_sync::RoleSyncError},
    model::{
        position::PositionCatalog,
        role_sync::{ReconcileReport, SyncReport},
    },
    service::gateway::RoleGateway,
};

pub struct RoleReconciler {
    gateway: Arc<dyn RoleGateway>,
    store: Arc<dyn RosterStore>,
    catalog: PositionCatalog,
    call_timeout: Duration,
}

impl RoleReconciler {
    pub fn new(
        gateway: Arc<dyn RoleGateway>,
        store: Arc<dyn RosterStore>,
        catalog: PositionCatalog,
        call_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            store,
            catalog,
            call_timeout,
        }
    }

    /// Brings one user's tracked roles in line with their position.
    ///
    /// With a target position the user gets that position's role (if it has one) and
    /// loses every other tracked role. Without a target every tracked role is revoked.
    ///
    /// # Arguments
    /// - `user_id` - Discord user to sync
    /// - `target` - Key of the position the user holds, `None` if off the roster
    ///
    /// # Returns
    /// - `Ok(SyncReport)` - Changes made; failed grants/revokes are counted, not raised
    /// - `Err(RoleSyncError::UnknownPosition)` - `target` is not in the catalog
    /// - `Err(RoleSyncError::NotInGuild)` - The user is not a guild member
    /// - `Err(RoleSyncError::Lookup)` - The user's roles could not be read
    pub async fn sync(
        &self,
        user_id: u64,
        target: Option<&str>,
    ) -> Result<SyncReport, RoleSyncError> {
        let target_role = match target {
            Some(key) => {
                self.catalog
                    .get(key)
                    .ok_or_else(|| RoleSyncError::UnknownPosition(key.to_string()))?
                    .role_id
            }
            None => None,
        };

        let held = self
            .bounded(self.gateway.member_roles(user_id))
            .await
            .map_err(|source| RoleSyncError::Lookup { user_id, source })?
            .ok_or(RoleSyncError::NotInGuild(user_id))?;

        let report = self.apply(user_id, &held, target_role).await;

        if report.changed() || report.failed > 0 {
            tracing::info!(
                "Synced roles of user {}: {} granted, {} revoked, {} failed",
                user_id,
                report.granted,
                report.revoked,
                report.failed
            );
        }

        Ok(report)
    }

    /// Grants the target role if missing and revokes every other tracked role held.
    async fn apply(&self, user_id: u64, held: &[u64], target_role: Option<u64>) -> SyncReport {
        let mut report = SyncReport::default();

        if let Some(role_id) = target_role {
            if !held.contains(&role_id) {
                match self.bounded(self.gateway.grant_role(user_id, role_id)).await {
                    Ok(()) => report.granted += 1,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to grant role {} to user {}: {}",
                            role_id,
                            user_id,
                            e
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        for role_id in self.catalog.tracked_role_ids() {
            if Some(role_id) == target_role || !held.contains(&role_id) {
                continue;
            }
            match self.bounded(self.gateway.revoke_role(user_id, role_id)).await {
                Ok(()) => report.revoked += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to revoke role {} from user {}: {}",
                        role_id,
                        user_id,
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Syncs every linked roster member, then strips tracked roles from users who are not
    /// on the roster at all.
    ///
    /// Lookup and role failures are counted in `errored` and never abort the run.
    ///
    /// # Returns
    /// - `Ok(ReconcileReport)` - Aggregate counters of the run
    /// - `Err(RoleSyncError::Store)` - The roster could not be loaded
    pub async fn reconcile_all(&self) -> Result<ReconcileReport, RoleSyncError> {
        let snapshot = self.store.load().await?;
        let linked = snapshot.linked_user_ids();
        let mut report = ReconcileReport::default();

        for user_id in &linked {
            let target = snapshot.position_of_user(*user_id);
            match self.sync(*user_id, target).await {
                Ok(sync) => {
                    report.checked += 1;
                    if sync.changed() {
                        report.fixed += 1;
                    }
                    if sync.failed > 0 {
                        report.errored += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to reconcile roles of user {}: {}", user_id, e);
                    report.errored += 1;
                }
            }
        }

        for role_id in self.catalog.tracked_role_ids() {
            let holders = match self.bounded(self.gateway.role_holders(role_id)).await {
                Ok(holders) => holders,
                Err(e) => {
                    tracing::warn!("Failed to list holders of role {}: {}", role_id, e);
                    report.errored += 1;
                    continue;
                }
            };

            for user_id in holders.into_iter().filter(|u| !linked.contains(u)) {
                match self.bounded(self.gateway.revoke_role(user_id, role_id)).await {
                    Ok(()) => report.removed += 1,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to revoke stray role {} from user {}: {}",
                            role_id,
                            user_id,
                            e
                        );
                        report.errored += 1;
                    }
                }
            }
        }

        tracing::info!(
            "Role reconciliation finished: {} checked, {} fixed, {} errored, {} removed",
            report.checked,
            report.fixed,
            report.errored,
            report.removed
        );

        Ok(report)
    }

    /// Runs a gateway call with the configured timeout.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, PlatformError>>,
    ) -> Result<T, PlatformError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PlatformError::Timeout(self.call_timeout)),
        }
    }
}
