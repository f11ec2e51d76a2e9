//! In-memory platform gateways for service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::time::Instant;

use crate::{
    error::platform::PlatformError,
    model::sticky::StickyBody,
    service::gateway::{ChannelGateway, RoleGateway},
};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel_id: u64,
    pub message_id: u64,
    pub body: StickyBody,
    pub at: Instant,
}

#[derive(Default)]
struct ChannelState {
    next_message_id: u64,
    /// message id -> channel id
    live: HashMap<u64, u64>,
    sent: Vec<SentMessage>,
    deleted: Vec<u64>,
    fail_sends: bool,
    fail_deletes: bool,
    gone_channels: HashSet<u64>,
}

#[derive(Default)]
pub struct FakeChannelGateway {
    state: Mutex<ChannelState>,
}

impl FakeChannelGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, channel_id: u64) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel_id == channel_id)
            .collect()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn live_in(&self, channel_id: u64) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        let mut ids: Vec<u64> = state
            .live
            .iter()
            .filter(|(_, ch)| **ch == channel_id)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    /// Removes a message as if a moderator deleted it.
    pub fn remove_externally(&self, message_id: u64) {
        self.state.lock().unwrap().live.remove(&message_id);
    }

    pub fn delete_channel(&self, channel_id: u64) {
        let mut state = self.state.lock().unwrap();
        state.gone_channels.insert(channel_id);
        state.live.retain(|_, ch| *ch != channel_id);
    }
}

#[serenity::async_trait]
impl ChannelGateway for FakeChannelGateway {
    async fn send_message(&self, channel_id: u64, body: &StickyBody) -> Result<u64, PlatformError> {
        let mut state = self.state.lock().unwrap();
        if state.gone_channels.contains(&channel_id) {
            return Err(PlatformError::UnknownChannel(channel_id));
        }
        if state.fail_sends {
            return Err(PlatformError::Send {
                channel_id,
                reason: "Missing Permissions".to_string(),
            });
        }
        state.next_message_id += 1;
        let message_id = 1000 + state.next_message_id;
        state.live.insert(message_id, channel_id);
        state.sent.push(SentMessage {
            channel_id,
            message_id,
            body: body.clone(),
            at: Instant::now(),
        });
        Ok(message_id)
    }

    async fn delete_message(&self, _channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(PlatformError::Discord(Box::new(serenity::Error::Other(
                "Missing Permissions",
            ))));
        }
        match state.live.remove(&message_id) {
            Some(_) => {
                state.deleted.push(message_id);
                Ok(())
            }
            None => Err(PlatformError::NotFound),
        }
    }

    async fn message_exists(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<bool, PlatformError> {
        let state = self.state.lock().unwrap();
        if state.gone_channels.contains(&channel_id) {
            return Err(PlatformError::UnknownChannel(channel_id));
        }
        Ok(state.live.contains_key(&message_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleCall {
    Grant { user_id: u64, role_id: u64 },
    Revoke { user_id: u64, role_id: u64 },
}

#[derive(Default)]
struct RoleState {
    /// user id -> held roles; absent users are not in the guild
    members: HashMap<u64, HashSet<u64>>,
    calls: Vec<RoleCall>,
    failing_lookups: HashSet<u64>,
    failing_roles: HashSet<u64>,
    hanging_users: HashSet<u64>,
}

#[derive(Default)]
pub struct FakeRoleGateway {
    state: Mutex<RoleState>,
}

impl FakeRoleGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, user_id: u64, roles: &[u64]) {
        self.state
            .lock()
            .unwrap()
            .members
            .insert(user_id, roles.iter().copied().collect());
    }

    pub fn roles_of(&self, user_id: u64) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        let mut roles: Vec<u64> = state
            .members
            .get(&user_id)
            .map(|r| r.iter().copied().collect())
            .unwrap_or_default();
        roles.sort_unstable();
        roles
    }

    pub fn calls(&self) -> Vec<RoleCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_lookup_for(&self, user_id: u64) {
        self.state.lock().unwrap().failing_lookups.insert(user_id);
    }

    /// Grants and revokes of this role fail.
    pub fn fail_role(&self, role_id: u64) {
        self.state.lock().unwrap().failing_roles.insert(role_id);
    }

    /// Lookups of this user never complete.
    pub fn hang_lookup_for(&self, user_id: u64) {
        self.state.lock().unwrap().hanging_users.insert(user_id);
    }

    fn change(&self, call: RoleCall) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        let (user_id, role_id, action) = match call {
            RoleCall::Grant { user_id, role_id } => (user_id, role_id, "grant"),
            RoleCall::Revoke { user_id, role_id } => (user_id, role_id, "revoke"),
        };
        state.calls.push(call);
        if state.failing_roles.contains(&role_id) {
            return Err(PlatformError::RoleOp {
                action,
                user_id,
                role_id,
                reason: "Missing Permissions".to_string(),
            });
        }
        let roles = state
            .members
            .get_mut(&user_id)
            .ok_or(PlatformError::NotFound)?;
        match call {
            RoleCall::Grant { .. } => roles.insert(role_id),
            RoleCall::Revoke { .. } => roles.remove(&role_id),
        };
        Ok(())
    }
}

#[serenity::async_trait]
impl RoleGateway for FakeRoleGateway {
    async fn member_roles(&self, user_id: u64) -> Result<Option<Vec<u64>>, PlatformError> {
        let hanging = self.state.lock().unwrap().hanging_users.contains(&user_id);
        if hanging {
            std::future::pending::<()>().await;
        }
        let state = self.state.lock().unwrap();
        if state.failing_lookups.contains(&user_id) {
            return Err(PlatformError::Lookup(format!("member {} unavailable", user_id)));
        }
        Ok(state
            .members
            .get(&user_id)
            .map(|roles| roles.iter().copied().collect()))
    }

    async fn grant_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError> {
        self.change(RoleCall::Grant { user_id, role_id })
    }

    async fn revoke_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError> {
        self.change(RoleCall::Revoke { user_id, role_id })
    }

    async fn role_holders(&self, role_id: u64) -> Result<Vec<u64>, PlatformError> {
        let state = self.state.lock().unwrap();
        let mut holders: Vec<u64> = state
            .members
            .iter()
            .filter(|(_, roles)| roles.contains(&role_id))
            .map(|(user_id, _)| *user_id)
            .collect();
        holders.sort_unstable();
        Ok(holders)
    }
}
