use std::path::PathBuf;

use poise::serenity_prelude::{ChannelId, GuildId, RoleId, UserId};
use tracing::info;

use crate::constants::TEMPLATES_DIR_NAME;

/// Default directory for the JSON data files
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set. Set it with: export {0}=...")]
    Missing(&'static str),
    #[error("{name} must be a non-zero Discord ID, got '{value}'")]
    InvalidId { name: &'static str, value: String },
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub guild_id: GuildId,
    pub birthday_role_id: RoleId,
    pub birthday_channel_id: ChannelId,
    pub owner_id: UserId,
    pub lobby_channel_id: ChannelId,
    pub blocked_role_id: RoleId,
    pub default_role_id: RoleId,
    pub data_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub dev_guild_id: Option<GuildId>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variable names
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let id = |name: &'static str| require_id(&lookup, name);

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let templates_dir = lookup("TEMPLATES_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(TEMPLATES_DIR_NAME));

        // Optional: development guild ID for faster command registration
        let dev_guild_id = lookup("DEV_GUILD_ID")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|&value| value != 0)
            .map(GuildId::new);

        if dev_guild_id.is_some() {
            info!("Development mode: Commands will be registered to guild only");
        }

        Ok(Self {
            discord_token,
            guild_id: GuildId::new(id("GUILD_ID")?),
            birthday_role_id: RoleId::new(id("BIRTHDAY_ROLE_ID")?),
            birthday_channel_id: ChannelId::new(id("BIRTHDAY_CHANNEL_ID")?),
            owner_id: UserId::new(id("OWNER_ID")?),
            lobby_channel_id: ChannelId::new(id("LOBBY_CHANNEL_ID")?),
            blocked_role_id: RoleId::new(id("BLOCKED_ROLE_ID")?),
            default_role_id: RoleId::new(id("DEFAULT_ROLE_ID")?),
            data_dir,
            templates_dir,
            dev_guild_id,
        })
    }
}

fn require_id(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<u64, ConfigError> {
    let value = lookup(name).ok_or(ConfigError::Missing(name))?;
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id != 0)
        .ok_or(ConfigError::InvalidId { name, value })
}
