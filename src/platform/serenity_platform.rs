use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, Cache, ChannelId, ChannelType, CreateChannel, CreateMessage, EditChannel,
    GuildId, Http, RoleId, UserId,
};
use tracing::warn;

use super::{Platform, TempChannelRequest};
use crate::error::PlatformError;
use crate::template::MessageTemplate;

/// Audit log reason attached to role changes
const ROLE_AUDIT_REASON: &str = "Birthday role";

/// [`Platform`] backed by serenity's HTTP client and gateway cache
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_context(ctx: &serenity::Context) -> Self {
        Self::new(Arc::clone(&ctx.http), Arc::clone(&ctx.cache))
    }

    fn cache_http(&self) -> (&Arc<Cache>, &Http) {
        (&self.cache, self.http.as_ref())
    }
}

/// Sort a serenity error into the kinds the services care about
fn classify(err: serenity::Error) -> PlatformError {
    if let serenity::Error::Http(http_error) = &err {
        match http_error.status_code().map(|status| status.as_u16()) {
            Some(429) => return PlatformError::RateLimited,
            Some(404) => return PlatformError::NotFound(http_error.to_string()),
            _ => {}
        }
    }
    PlatformError::Request(err.to_string())
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn member_username(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<String>, PlatformError> {
        match guild_id.member(self.cache_http(), user_id).await {
            Ok(member) => Ok(Some(member.user.name.clone())),
            Err(e) => match classify(e) {
                PlatformError::NotFound(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn member_has_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, PlatformError> {
        match guild_id.member(self.cache_http(), user_id).await {
            Ok(member) => Ok(member.roles.contains(&role_id)),
            Err(e) => match classify(e) {
                PlatformError::NotFound(_) => Ok(false),
                other => Err(other),
            },
        }
    }

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError> {
        self.http
            .add_member_role(guild_id, user_id, role_id, Some(ROLE_AUDIT_REASON))
            .await
            .map_err(classify)
    }

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, Some(ROLE_AUDIT_REASON))
            .await
            .map_err(classify)
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<(), PlatformError> {
        channel_id
            .send_message(&self.http, CreateMessage::new().content(content))
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn send_template(
        &self,
        channel_id: ChannelId,
        template: &MessageTemplate,
    ) -> Result<(), PlatformError> {
        channel_id
            .send_message(&self.http, template.to_message())
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: &TempChannelRequest,
    ) -> Result<ChannelId, PlatformError> {
        let lobby = request
            .lobby_id
            .to_channel(&self.http)
            .await
            .map_err(classify)?
            .guild()
            .ok_or_else(|| PlatformError::NotFound(format!("lobby channel {}", request.lobby_id)))?;
        let position = lobby.position.saturating_add(1);

        let mut create_channel = CreateChannel::new(&request.name)
            .kind(ChannelType::Voice)
            .position(position)
            .user_limit(request.user_limit)
            .permissions(request.overwrites.clone());

        if let Some(category_id) = lobby.parent_id {
            create_channel = create_channel.category(category_id);
        }

        let channel = guild_id
            .create_channel(&self.http, create_channel)
            .await
            .map_err(classify)?;

        // Discord does not always honour the position given at creation time
        if let Err(e) = channel
            .id
            .edit(&self.http, EditChannel::new().position(position))
            .await
        {
            warn!("Failed to reposition temp channel {}: {}", channel.id, e);
        }

        Ok(channel.id)
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        channel_id
            .delete(&self.http)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), PlatformError> {
        guild_id
            .move_member(&self.http, user_id, channel_id)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn voice_member_count(
        &self,
        channel_id: ChannelId,
    ) -> Result<Option<usize>, PlatformError> {
        let channel = match channel_id.to_channel(&self.http).await {
            Ok(channel) => channel,
            Err(e) => {
                return match classify(e) {
                    PlatformError::NotFound(_) => Ok(None),
                    other => Err(other),
                };
            }
        };

        match channel.guild() {
            Some(guild_channel) => guild_channel
                .members(&self.cache)
                .map(|members| Some(members.len()))
                .map_err(classify),
            None => Ok(None),
        }
    }
}
