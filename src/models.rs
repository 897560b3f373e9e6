use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    config::Config,
    error::StoreError,
    services::{
        birthday_service::{BirthdayService, BirthdaySettings},
        message_service::MessageService,
        voice_service::{VoiceChannelService, VoiceSettings},
    },
};

/// A user's registered birthday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayRecord {
    pub day: u32,
    pub month: u32,
    pub timezone: String,
}

/// Seconds since the Unix epoch
///
/// Older data files stored fractional timestamps, so floats are accepted on
/// read and truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawEpochSeconds")]
pub struct EpochSeconds(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEpochSeconds {
    Whole(i64),
    Fractional(f64),
}

impl From<RawEpochSeconds> for EpochSeconds {
    fn from(raw: RawEpochSeconds) -> Self {
        match raw {
            RawEpochSeconds::Whole(secs) => EpochSeconds(secs),
            RawEpochSeconds::Fractional(secs) => EpochSeconds(secs as i64),
        }
    }
}

/// Represents a temporary voice channel owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempChannelRecord {
    pub owner_id: u64,
    pub created_at: EpochSeconds,
}

/// Birthdays keyed by user ID
pub type BirthdayMap = BTreeMap<u64, BirthdayRecord>;

/// Active birthday role grants: user ID to the time the role was granted
pub type GrantMap = BTreeMap<u64, EpochSeconds>;

/// Temporary voice channels keyed by channel ID
pub type TempChannelMap = BTreeMap<u64, TempChannelRecord>;

/// Bot state shared across all handlers
#[derive(Clone)]
pub struct Data {
    pub birthdays: Arc<BirthdayService>,
    pub messages: Arc<MessageService>,
    pub voice: Arc<VoiceChannelService>,
}

impl Data {
    /// Open every store under the configured data directory
    pub async fn load(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let birthdays = BirthdayService::open(
            BirthdaySettings {
                guild_id: config.guild_id,
                role_id: config.birthday_role_id,
                channel_id: config.birthday_channel_id,
            },
            &config.data_dir,
        )
        .await?;

        let voice = VoiceChannelService::open(
            VoiceSettings {
                lobby_channel_id: config.lobby_channel_id,
                blocked_role_id: config.blocked_role_id,
                default_role_id: config.default_role_id,
            },
            &config.data_dir,
            Arc::clone(&clock),
        )
        .await?;

        let messages = MessageService::new(config.owner_id, config.templates_dir.clone(), clock);

        tracing::info!(
            "Loaded {} birthdays and {} temp channels from {}",
            birthdays.birthday_count().await,
            voice.channel_count().await,
            config.data_dir.display()
        );

        Ok(Self {
            birthdays: Arc::new(birthdays),
            messages: Arc::new(messages),
            voice: Arc::new(voice),
        })
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
