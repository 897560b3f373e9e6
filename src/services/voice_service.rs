//! Temporary voice channels created from a lobby.
//!
//! Joining the lobby creates a personal channel next to it and moves the
//! member in; a recorded channel is deleted as soon as it is empty. Ownership
//! records are persisted so channels that emptied while the bot was offline
//! are cleaned up by [`VoiceChannelService::startup_cleanup`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use poise::serenity_prelude::{ChannelId, GuildId, RoleId, UserId};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{
    clock::Clock,
    constants::{CHANNEL_CREATE_COOLDOWN, PLATFORM_RETRY_DELAY, TEMP_CHANNELS_FILE, TEMP_CHANNEL_USER_LIMIT},
    error::{BotError, StoreError},
    models::{EpochSeconds, TempChannelMap, TempChannelRecord},
    platform::{Platform, TempChannelRequest},
    store::JsonStore,
    utils::channel_utils::{format_temp_channel_name, temp_channel_overwrites},
    utils::retry::{retry_once, unless_not_found},
};

#[derive(Debug, Clone)]
pub struct VoiceSettings {
    pub lobby_channel_id: ChannelId,
    pub blocked_role_id: RoleId,
    pub default_role_id: RoleId,
}

/// What happened to a recorded channel when it was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCheck {
    /// Empty, deleted and forgotten
    Deleted,
    /// Already gone from the platform, record dropped
    Forgotten,
    /// Still has members
    Kept,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<ChannelId>,
    pub forgotten: Vec<ChannelId>,
    pub kept: Vec<ChannelId>,
    pub failed: Vec<ChannelId>,
}

/// A reserved channel creation time and the reservation it replaced
#[derive(Debug, Clone, Copy)]
struct CreationSlot {
    at: DateTime<Utc>,
    previous: Option<DateTime<Utc>>,
}

pub struct VoiceChannelService {
    settings: VoiceSettings,
    channels: JsonStore<TempChannelMap>,
    /// Latest reserved channel creation per member
    last_created: DashMap<UserId, DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl VoiceChannelService {
    pub async fn open(
        settings: VoiceSettings,
        data_dir: &Path,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            settings,
            channels: JsonStore::open(data_dir.join(TEMP_CHANNELS_FILE)).await?,
            last_created: DashMap::new(),
            clock,
        })
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read(|map| map.len()).await
    }

    pub fn is_lobby(&self, channel_id: ChannelId) -> bool {
        channel_id == self.settings.lobby_channel_id
    }

    pub async fn owner_of(&self, channel_id: ChannelId) -> Option<UserId> {
        self.channels
            .read(|map| map.get(&channel_id.get()).map(|record| UserId::new(record.owner_id)))
            .await
    }

    /// How long `user_id` still has to wait before another channel is created
    pub fn creation_delay(&self, user_id: UserId) -> Option<Duration> {
        let last = *self.last_created.get(&user_id)?;
        let cooldown = chrono::Duration::from_std(CHANNEL_CREATE_COOLDOWN).ok()?;
        (cooldown - (self.clock.now() - last))
            .to_std()
            .ok()
            .filter(|d| !d.is_zero())
    }

    /// Claim the member's next creation time, at least one cooldown after the previous claim
    fn reserve_creation_slot(&self, user_id: UserId) -> CreationSlot {
        let now = self.clock.now();
        let cooldown =
            chrono::Duration::from_std(CHANNEL_CREATE_COOLDOWN).unwrap_or_else(|_| chrono::Duration::zero());

        match self.last_created.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let previous = *entry.get();
                let at = (previous + cooldown).max(now);
                entry.insert(at);
                CreationSlot {
                    at,
                    previous: Some(previous),
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                CreationSlot {
                    at: now,
                    previous: None,
                }
            }
        }
    }

    /// Give back a slot whose creation failed, unless a later join already built on it
    fn release_creation_slot(&self, user_id: UserId, slot: CreationSlot) {
        if let Entry::Occupied(mut entry) = self.last_created.entry(user_id)
            && *entry.get() == slot.at
        {
            match slot.previous {
                Some(previous) => {
                    entry.insert(previous);
                }
                None => {
                    entry.remove();
                }
            }
        }
    }

    /// React to a member moving between voice channels
    ///
    /// The channel being left is handled before the one being joined.
    pub async fn handle_voice_update(
        &self,
        platform: &dyn Platform,
        guild_id: GuildId,
        user_id: UserId,
        username: Option<&str>,
        old_channel: Option<ChannelId>,
        new_channel: Option<ChannelId>,
    ) {
        if old_channel == new_channel {
            return;
        }

        if let Some(old) = old_channel
            && let Some(owner_id) = self.owner_of(old).await
        {
            match self.remove_if_empty(platform, old).await {
                Ok(ChannelCheck::Deleted) => {
                    info!("Deleted empty temp channel {} owned by {}", old, owner_id)
                }
                Ok(_) => {}
                Err(e) => error!("Failed to clean up temp channel {}: {}", old, e),
            }
        }

        if let Some(new) = new_channel
            && self.is_lobby(new)
            && let Err(e) = self
                .on_lobby_join(platform, guild_id, user_id, username)
                .await
        {
            error!("Failed to create temp channel for {}: {}", user_id, e);
        }
    }

    /// Create a personal channel for a member who joined the lobby and move them into it
    pub async fn on_lobby_join(
        &self,
        platform: &dyn Platform,
        guild_id: GuildId,
        user_id: UserId,
        username: Option<&str>,
    ) -> Result<Option<ChannelId>, BotError> {
        let name = match username {
            Some(name) => name.to_string(),
            None => match platform.member_username(guild_id, user_id).await? {
                Some(name) => name,
                None => {
                    debug!("User {} joined the lobby but is not a member", user_id);
                    return Ok(None);
                }
            },
        };

        let slot = self.reserve_creation_slot(user_id);
        if let Ok(delay) = (slot.at - self.clock.now()).to_std()
            && !delay.is_zero()
        {
            debug!("Delaying channel creation for {} by {:?}", user_id, delay);
            sleep(delay).await;
        }

        let request = TempChannelRequest {
            name: format_temp_channel_name(&name),
            lobby_id: self.settings.lobby_channel_id,
            user_limit: TEMP_CHANNEL_USER_LIMIT,
            overwrites: temp_channel_overwrites(
                user_id,
                self.settings.blocked_role_id,
                self.settings.default_role_id,
            ),
        };

        let created = retry_once(
            "Creating temp channel",
            PLATFORM_RETRY_DELAY,
            unless_not_found,
            || platform.create_voice_channel(guild_id, &request),
        )
        .await;
        let channel_id = match created {
            Ok(channel_id) => channel_id,
            Err(e) => {
                self.release_creation_slot(user_id, slot);
                return Err(e.into());
            }
        };
        let now = self.clock.now();

        let record = TempChannelRecord {
            owner_id: user_id.get(),
            created_at: EpochSeconds(now.timestamp()),
        };
        if let Err(e) = self
            .channels
            .update(|map| map.insert(channel_id.get(), record))
            .await
        {
            // An unrecorded channel would never be cleaned up
            if let Err(delete_err) = platform.delete_channel(channel_id).await {
                warn!("Failed to delete unrecorded channel {}: {}", channel_id, delete_err);
            }
            return Err(e.into());
        }

        let moved = retry_once(
            "Moving member into temp channel",
            PLATFORM_RETRY_DELAY,
            unless_not_found,
            || platform.move_member(guild_id, user_id, channel_id),
        )
        .await;
        if let Err(e) = moved {
            if let Err(cleanup_err) = self.remove_if_empty(platform, channel_id).await {
                warn!("Failed to remove unused channel {}: {}", channel_id, cleanup_err);
            }
            return Err(e.into());
        }

        info!(
            "Created temp channel {} for user {} in guild {}",
            channel_id, user_id, guild_id
        );
        Ok(Some(channel_id))
    }

    /// Delete a recorded channel if nobody is connected to it
    pub async fn remove_if_empty(
        &self,
        platform: &dyn Platform,
        channel_id: ChannelId,
    ) -> Result<ChannelCheck, BotError> {
        let check = match platform.voice_member_count(channel_id).await? {
            None => ChannelCheck::Forgotten,
            Some(0) => {
                let deleted = retry_once(
                    "Deleting temp channel",
                    PLATFORM_RETRY_DELAY,
                    unless_not_found,
                    || platform.delete_channel(channel_id),
                )
                .await;
                match deleted {
                    Ok(()) => ChannelCheck::Deleted,
                    Err(e) if e.is_not_found() => ChannelCheck::Forgotten,
                    Err(e) => return Err(e.into()),
                }
            }
            Some(_) => return Ok(ChannelCheck::Kept),
        };

        self.channels
            .update(|map| {
                map.remove(&channel_id.get());
            })
            .await?;
        Ok(check)
    }

    /// Reconcile every recorded channel against the platform, e.g. after a restart
    pub async fn startup_cleanup(&self, platform: &dyn Platform) -> CleanupReport {
        let mut report = CleanupReport::default();
        let recorded: Vec<ChannelId> = self
            .channels
            .read(|map| map.keys().map(|id| ChannelId::new(*id)).collect())
            .await;

        for channel_id in recorded {
            match self.remove_if_empty(platform, channel_id).await {
                Ok(ChannelCheck::Deleted) => report.deleted.push(channel_id),
                Ok(ChannelCheck::Forgotten) => report.forgotten.push(channel_id),
                Ok(ChannelCheck::Kept) => report.kept.push(channel_id),
                Err(e) => {
                    error!("Failed to check temp channel {}: {}", channel_id, e);
                    report.failed.push(channel_id);
                }
            }
        }

        report
    }
}
