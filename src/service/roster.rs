//! Roster manager.
//!
//! CRUD over roster members with the capacity and uniqueness rules enforced, followed by
//! a role sync for every user whose position changed. All mutations run under one lock
//! as `load + mutate + save`, and every save recomputes the roster metadata.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tokio::sync::Mutex;

use crate::{
    data::store::RosterStore,
    error::roster::RosterError,
    model::{
        position::PositionCatalog,
        roster::{
            Member, MemberChoice, NewMemberParam, Position, PositionStats, RosterSnapshot,
            RosterStats, SearchHit, UpdateMemberParam,
        },
    },
    service::role_sync::RoleReconciler,
};

/// Retries before giving up on finding a free member id.
const MAX_ID_ATTEMPTS: u32 = 10_000;

/// Maximum number of autocomplete suggestions Discord accepts.
const MAX_CHOICES: usize = 25;

/// Picks a random 4-digit id not used anywhere in the roster.
///
/// # Returns
/// - `Ok(String)` - Free id between `1000` and `9999`
/// - `Err(RosterError::IdSpaceExhausted)` - No free id found within the retry budget
pub fn generate_member_id(
    snapshot: &RosterSnapshot,
    rng: &mut impl Rng,
) -> Result<String, RosterError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = rng.random_range(1000..10000u32).to_string();
        if !snapshot.contains_member_id(&candidate) {
            return Ok(candidate);
        }
    }
    Err(RosterError::IdSpaceExhausted(MAX_ID_ATTEMPTS))
}

pub struct RosterService {
    store: Arc<dyn RosterStore>,
    catalog: PositionCatalog,
    reconciler: Option<Arc<RoleReconciler>>,
    lock: Mutex<()>,
}

impl RosterService {
    pub fn new(store: Arc<dyn RosterStore>, catalog: PositionCatalog) -> Self {
        Self {
            store,
            catalog,
            reconciler: None,
            lock: Mutex::new(()),
        }
    }

    /// Syncs Discord roles after every mutation that affects a linked user.
    pub fn with_reconciler(mut self, reconciler: Arc<RoleReconciler>) -> Self {
        self.reconciler = Some(reconciler);
        self
    }

    pub fn catalog(&self) -> &PositionCatalog {
        &self.catalog
    }

    /// Adds a member to a position.
    ///
    /// # Arguments
    /// - `position_key` - Position to add to
    /// - `param` - Name, optional linked user and optional explicit id
    /// - `added_by` - Discord user performing the change
    ///
    /// # Returns
    /// - `Ok(Member)` - The stored member with its id
    /// - `Err(RosterError::InvalidPosition)` - Unknown position
    /// - `Err(RosterError::PositionFull)` - The position is at capacity
    /// - `Err(RosterError::DuplicateMember)` - The user or the explicit id is already on
    ///   the roster
    pub async fn add_member(
        &self,
        position_key: &str,
        param: NewMemberParam,
        added_by: Option<u64>,
    ) -> Result<Member, RosterError> {
        let member = {
            let _guard = self.lock.lock().await;
            let mut snapshot = self.store.load().await?;

            let position = snapshot
                .position(position_key)
                .ok_or_else(|| RosterError::InvalidPosition(position_key.to_string()))?;
            if position.is_full() {
                return Err(full_error(position));
            }
            if let Some(holder) = param
                .user_id
                .and_then(|user_id| snapshot.member_of_user(user_id))
                .map(|(holder, _)| holder)
            {
                return Err(RosterError::DuplicateMember(holder.name.clone()));
            }
            if let Some(holder) = param.id.as_deref().and_then(|id| {
                snapshot
                    .positions
                    .iter()
                    .find(|p| p.member(id).is_some())
            }) {
                return Err(RosterError::DuplicateMember(holder.name.clone()));
            }

            let id = match param.id {
                Some(id) => id,
                None => generate_member_id(&snapshot, &mut rand::rng())?,
            };
            let now = Utc::now();
            let member = Member {
                id,
                name: param.name.trim().to_string(),
                user_id: param.user_id,
                added_by,
                added_at: now,
                last_updated: None,
                moved_at: None,
            };

            if let Some(position) = snapshot.position_mut(position_key) {
                position.members.push(member.clone());
            }
            snapshot.touch(now);
            self.store.save(&snapshot).await?;

            tracing::info!(
                "Added member {} ({}) to position {}",
                member.name,
                member.id,
                position_key
            );

            member
        };

        if let Some(user_id) = member.user_id {
            self.sync_user(user_id, Some(position_key)).await;
        }

        Ok(member)
    }

    /// Removes a member from a position and returns it.
    pub async fn remove_member(
        &self,
        position_key: &str,
        member_id: &str,
    ) -> Result<Member, RosterError> {
        let (member, remaining) = {
            let _guard = self.lock.lock().await;
            let mut snapshot = self.store.load().await?;

            let position = snapshot
                .position_mut(position_key)
                .ok_or_else(|| RosterError::InvalidPosition(position_key.to_string()))?;
            let index = position
                .member_index(member_id)
                .ok_or_else(|| RosterError::MemberNotFound(member_id.to_string()))?;
            let member = position.members.remove(index);

            snapshot.touch(Utc::now());
            self.store.save(&snapshot).await?;

            tracing::info!(
                "Removed member {} ({}) from position {}",
                member.name,
                member.id,
                position_key
            );

            let remaining = member
                .user_id
                .and_then(|user_id| snapshot.position_of_user(user_id))
                .map(str::to_string);
            (member, remaining)
        };

        if let Some(user_id) = member.user_id {
            self.sync_user(user_id, remaining.as_deref()).await;
        }

        Ok(member)
    }

    /// Changes a member's name and/or linked user, leaving other fields untouched.
    ///
    /// # Returns
    /// - `Ok(Member)` - The updated member
    /// - `Err(RosterError::EmptyUpdate)` - Neither field was given
    /// - `Err(RosterError::InvalidPosition)` - Unknown position
    /// - `Err(RosterError::MemberNotFound)` - No member with this id in the position
    /// - `Err(RosterError::DuplicateMember)` - The new user is linked to another member
    pub async fn update_member(
        &self,
        position_key: &str,
        member_id: &str,
        param: UpdateMemberParam,
    ) -> Result<Member, RosterError> {
        if param.is_empty() {
            return Err(RosterError::EmptyUpdate);
        }

        let (updated, previous_user, previous_target) = {
            let _guard = self.lock.lock().await;
            let mut snapshot = self.store.load().await?;

            if let Some(Some(user_id)) = param.user_id {
                let holder = snapshot.positions.iter().find(|p| {
                    p.members.iter().any(|m| {
                        m.user_id == Some(user_id) && (p.key != position_key || m.id != member_id)
                    })
                });
                if let Some(holder) = holder {
                    return Err(RosterError::DuplicateMember(holder.name.clone()));
                }
            }

            let position = snapshot
                .position_mut(position_key)
                .ok_or_else(|| RosterError::InvalidPosition(position_key.to_string()))?;
            let index = position
                .member_index(member_id)
                .ok_or_else(|| RosterError::MemberNotFound(member_id.to_string()))?;

            let now = Utc::now();
            let member = &mut position.members[index];
            let previous_user = member.user_id;
            if let Some(name) = param.name {
                member.name = name.trim().to_string();
            }
            if let Some(user_id) = param.user_id {
                member.user_id = user_id;
            }
            member.last_updated = Some(now);
            let updated = member.clone();

            snapshot.touch(now);
            self.store.save(&snapshot).await?;

            tracing::info!("Updated member {} in position {}", member_id, position_key);

            let previous_target = previous_user
                .and_then(|user_id| snapshot.position_of_user(user_id))
                .map(str::to_string);
            (updated, previous_user, previous_target)
        };

        if previous_user != updated.user_id {
            if let Some(user_id) = previous_user {
                self.sync_user(user_id, previous_target.as_deref()).await;
            }
        }
        if let Some(user_id) = updated.user_id {
            self.sync_user(user_id, Some(position_key)).await;
        }

        Ok(updated)
    }

    /// Moves a member to another position, appending it there.
    ///
    /// The destination's capacity is checked before the member leaves its source, so a
    /// failed move leaves the roster unchanged.
    ///
    /// # Returns
    /// - `Ok(Member)` - The moved member with `moved_at` stamped
    /// - `Err(RosterError::InvalidPosition)` - Unknown source or destination
    /// - `Err(RosterError::SamePosition)` - Source and destination are the same
    /// - `Err(RosterError::PositionFull)` - The destination is at capacity
    /// - `Err(RosterError::MemberNotFound)` - No member with this id in the source
    pub async fn move_member(
        &self,
        from_key: &str,
        to_key: &str,
        member_id: &str,
    ) -> Result<Member, RosterError> {
        let moved = {
            let _guard = self.lock.lock().await;
            let mut snapshot = self.store.load().await?;

            if snapshot.position(from_key).is_none() {
                return Err(RosterError::InvalidPosition(from_key.to_string()));
            }
            let destination = snapshot
                .position(to_key)
                .ok_or_else(|| RosterError::InvalidPosition(to_key.to_string()))?;
            if from_key == to_key {
                return Err(RosterError::SamePosition);
            }
            if destination.is_full() {
                return Err(full_error(destination));
            }

            let source = snapshot
                .position_mut(from_key)
                .ok_or_else(|| RosterError::InvalidPosition(from_key.to_string()))?;
            let index = source
                .member_index(member_id)
                .ok_or_else(|| RosterError::MemberNotFound(member_id.to_string()))?;
            let mut member = source.members.remove(index);

            let now = Utc::now();
            member.moved_at = Some(now);
            if let Some(destination) = snapshot.position_mut(to_key) {
                destination.members.push(member.clone());
            }

            snapshot.touch(now);
            self.store.save(&snapshot).await?;

            tracing::info!(
                "Moved member {} from position {} to {}",
                member_id,
                from_key,
                to_key
            );

            member
        };

        if let Some(user_id) = moved.user_id {
            self.sync_user(user_id, Some(to_key)).await;
        }

        Ok(moved)
    }

    /// Case-insensitive substring search on member name or id across all positions.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RosterError> {
        let snapshot = self.store.load().await?;
        let query = query.trim().to_lowercase();

        Ok(snapshot
            .positions
            .iter()
            .flat_map(|position| {
                position
                    .members
                    .iter()
                    .filter(|m| {
                        m.name.to_lowercase().contains(&query)
                            || m.id.to_lowercase().contains(&query)
                    })
                    .map(|m| SearchHit {
                        member: m.clone(),
                        position_key: position.key.clone(),
                        position_name: position.name.clone(),
                    })
            })
            .collect())
    }

    /// Fill level of every position plus roster totals.
    pub async fn stats(&self) -> Result<RosterStats, RosterError> {
        let snapshot = self.store.load().await?;

        let positions = snapshot
            .positions
            .iter()
            .map(|p| PositionStats {
                key: p.key.clone(),
                name: p.name.clone(),
                current: p.members.len(),
                max: p.max_members,
                percentage: percentage(p.members.len(), p.max_members),
            })
            .collect();

        Ok(RosterStats {
            positions,
            total_members: snapshot.total_members(),
            last_updated: snapshot.metadata.last_updated,
        })
    }

    /// One position with its members.
    pub async fn list(&self, position_key: &str) -> Result<Position, RosterError> {
        let snapshot = self.store.load().await?;
        snapshot
            .position(position_key)
            .cloned()
            .ok_or_else(|| RosterError::InvalidPosition(position_key.to_string()))
    }

    /// The whole roster in catalog order.
    pub async fn snapshot(&self) -> Result<RosterSnapshot, RosterError> {
        Ok(self.store.load().await?)
    }

    /// Member id suggestions matching `query`, optionally limited to one position.
    pub async fn autocomplete(
        &self,
        query: &str,
        position_key: Option<&str>,
    ) -> Result<Vec<MemberChoice>, RosterError> {
        let snapshot = self.store.load().await?;
        let query = query.trim().to_lowercase();

        Ok(snapshot
            .positions
            .iter()
            .filter(|p| position_key.is_none_or(|key| p.key == key))
            .flat_map(|p| p.members.iter())
            .filter(|m| {
                m.name.to_lowercase().contains(&query) || m.id.to_lowercase().contains(&query)
            })
            .take(MAX_CHOICES)
            .map(|m| MemberChoice {
                label: format!("{} | ID: {}", m.name, m.id),
                value: m.id.clone(),
            })
            .collect())
    }

    async fn sync_user(&self, user_id: u64, target: Option<&str>) {
        let Some(reconciler) = &self.reconciler else {
            return;
        };
        if let Err(e) = reconciler.sync(user_id, target).await {
            tracing::warn!("Failed to sync roles of user {}: {}", user_id, e);
        }
    }
}

fn full_error(position: &Position) -> RosterError {
    RosterError::PositionFull {
        name: position.name.clone(),
        current: position.members.len(),
        max: position.max_members,
    }
}

fn percentage(current: usize, max: usize) -> u32 {
    if max == 0 {
        return 0;
    }
    ((current as f64 / max as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod test;
