//! The chat-platform operations the feature services depend on.
//!
//! Services only talk to Discord through [`Platform`], which keeps them
//! testable against an in-memory fake.

mod serenity_platform;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, PermissionOverwrite, RoleId, UserId};

use crate::error::PlatformError;
use crate::template::MessageTemplate;

pub use serenity_platform::SerenityPlatform;

/// Everything needed to create a temporary voice channel next to a lobby
#[derive(Debug, Clone)]
pub struct TempChannelRequest {
    pub name: String,
    pub lobby_id: ChannelId,
    pub user_limit: u32,
    pub overwrites: Vec<PermissionOverwrite>,
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Username of a guild member, `None` if the user is not in the guild
    async fn member_username(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<String>, PlatformError>;

    /// Whether the user is in the guild and holds the role
    async fn member_has_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, PlatformError>;

    async fn add_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError>;

    async fn remove_role(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError>;

    async fn send_message(&self, channel_id: ChannelId, content: &str)
    -> Result<(), PlatformError>;

    async fn send_template(
        &self,
        channel_id: ChannelId,
        template: &MessageTemplate,
    ) -> Result<(), PlatformError>;

    /// Create a voice channel positioned after the lobby, returning its ID
    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: &TempChannelRequest,
    ) -> Result<ChannelId, PlatformError>;

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError>;

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), PlatformError>;

    /// Members connected to a voice channel, `None` if the channel no longer exists
    async fn voice_member_count(&self, channel_id: ChannelId)
    -> Result<Option<usize>, PlatformError>;
}
