//! Discord implementations of the platform gateways.

use std::sync::Arc;

use serenity::all::{ChannelId, GuildId, MessageId, RoleId, UserId};
use serenity::http::{Http, HttpError};

use crate::{
    bot::render::render_sticky,
    error::platform::PlatformError,
    model::sticky::StickyBody,
    service::gateway::{ChannelGateway, RoleGateway},
};

/// Discord JSON error code for an unknown channel.
const UNKNOWN_CHANNEL: isize = 10003;

/// Page size of the guild member listing endpoint.
const MEMBER_PAGE_SIZE: u64 = 1000;

const AUDIT_LOG_REASON: &str = "Castilla roster sync";

/// Gateway over the bot's HTTP client, scoped to the managed guild.
pub struct DiscordGateway {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }
}

/// Status and Discord JSON error code of a failed request, if it reached Discord.
fn response_error(err: &serenity::Error) -> Option<(u16, isize)> {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            Some((response.status_code.as_u16(), response.error.code))
        }
        _ => None,
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(response_error(err), Some((404, _)))
}

#[serenity::async_trait]
impl ChannelGateway for DiscordGateway {
    async fn send_message(&self, channel_id: u64, body: &StickyBody) -> Result<u64, PlatformError> {
        match ChannelId::new(channel_id)
            .send_message(&self.http, render_sticky(body))
            .await
        {
            Ok(message) => Ok(message.id.get()),
            Err(e) if matches!(response_error(&e), Some((_, UNKNOWN_CHANNEL))) => {
                Err(PlatformError::UnknownChannel(channel_id))
            }
            Err(e) => Err(PlatformError::Send {
                channel_id,
                reason: e.to_string(),
            }),
        }
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), PlatformError> {
        match self
            .http
            .delete_message(
                ChannelId::new(channel_id),
                MessageId::new(message_id),
                None,
            )
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Err(PlatformError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn message_exists(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<bool, PlatformError> {
        match self
            .http
            .get_message(ChannelId::new(channel_id), MessageId::new(message_id))
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match response_error(&e) {
                Some((_, UNKNOWN_CHANNEL)) => Err(PlatformError::UnknownChannel(channel_id)),
                Some((404, _)) => Ok(false),
                _ => Err(e.into()),
            },
        }
    }
}

#[serenity::async_trait]
impl RoleGateway for DiscordGateway {
    async fn member_roles(&self, user_id: u64) -> Result<Option<Vec<u64>>, PlatformError> {
        match self
            .http
            .get_member(self.guild_id, UserId::new(user_id))
            .await
        {
            Ok(member) => Ok(Some(member.roles.iter().map(|r| r.get()).collect())),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(PlatformError::Lookup(e.to_string())),
        }
    }

    async fn grant_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError> {
        self.http
            .add_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_LOG_REASON),
            )
            .await
            .map_err(|e| PlatformError::RoleOp {
                action: "grant",
                user_id,
                role_id,
                reason: e.to_string(),
            })
    }

    async fn revoke_role(&self, user_id: u64, role_id: u64) -> Result<(), PlatformError> {
        self.http
            .remove_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_LOG_REASON),
            )
            .await
            .map_err(|e| PlatformError::RoleOp {
                action: "revoke",
                user_id,
                role_id,
                reason: e.to_string(),
            })
    }

    async fn role_holders(&self, role_id: u64) -> Result<Vec<u64>, PlatformError> {
        let role = RoleId::new(role_id);
        let mut holders = Vec::new();
        let mut after = None;

        loop {
            let page = self
                .http
                .get_guild_members(self.guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|e| PlatformError::Lookup(e.to_string()))?;

            let Some(last) = page.last() else {
                break;
            };
            after = Some(last.user.id.get());
            let full_page = page.len() as u64 == MEMBER_PAGE_SIZE;

            holders.extend(
                page.iter()
                    .filter(|m| m.roles.contains(&role))
                    .map(|m| m.user.id.get()),
            );

            if !full_page {
                break;
            }
        }

        Ok(holders)
    }
}
