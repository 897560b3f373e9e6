/// Birthday service - handles business logic for birthday records and roles
use std::path::Path;

use chrono::{DateTime, Utc};
use poise::serenity_prelude::{ChannelId, GuildId, Mentionable, RoleId, UserId};
use tracing::{debug, error, info, warn};

use crate::{
    constants::{ACTIVE_ROLES_FILE, BIRTHDAYS_FILE, BIRTHDAY_ROLE_HOLD_SECS},
    error::{BotError, StoreError},
    models::{BirthdayMap, BirthdayRecord, EpochSeconds, GrantMap},
    platform::Platform,
    store::JsonStore,
    utils::datetime::{hold_elapsed, matches_birthday},
    utils::messages::build_birthday_announcement,
    utils::message_formatter::ListedBirthday,
    utils::timezone::parse_timezone,
    utils::validation::{ValidationError, validate_birthday},
};

/// Where birthdays are celebrated
#[derive(Debug, Clone)]
pub struct BirthdaySettings {
    pub guild_id: GuildId,
    pub role_id: RoleId,
    pub channel_id: ChannelId,
}

/// Outcome of one reconciliation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub granted: Vec<UserId>,
    pub revoked: Vec<UserId>,
    pub failed: Vec<UserId>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.revoked.is_empty() && self.failed.is_empty()
    }
}

/// Service for birthday-related operations
pub struct BirthdayService {
    settings: BirthdaySettings,
    birthdays: JsonStore<BirthdayMap>,
    grants: JsonStore<GrantMap>,
}

impl BirthdayService {
    /// Open the birthday and grant stores inside `data_dir`
    pub async fn open(settings: BirthdaySettings, data_dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            settings,
            birthdays: JsonStore::open(data_dir.join(BIRTHDAYS_FILE)).await?,
            grants: JsonStore::open(data_dir.join(ACTIVE_ROLES_FILE)).await?,
        })
    }

    pub fn settings(&self) -> &BirthdaySettings {
        &self.settings
    }

    pub async fn birthday_count(&self) -> usize {
        self.birthdays.read(|map| map.len()).await
    }

    /// Save a user's birthday, replacing any earlier one
    pub async fn set_birthday(
        &self,
        user_id: UserId,
        day: u32,
        month: u32,
        timezone: &str,
    ) -> Result<BirthdayRecord, BotError> {
        validate_birthday(day, month, timezone)?;

        let record = BirthdayRecord {
            day,
            month,
            timezone: timezone.trim().to_string(),
        };
        self.birthdays
            .update(|map| map.insert(user_id.get(), record.clone()))
            .await?;

        info!(
            "Saved birthday {}/{} ({}) for user {}",
            month, day, record.timezone, user_id
        );
        Ok(record)
    }

    /// All birthdays sorted by month, then day, then user ID
    pub async fn sorted_birthdays(&self) -> Vec<(UserId, BirthdayRecord)> {
        let mut birthdays: Vec<(UserId, BirthdayRecord)> = self
            .birthdays
            .read(|map| {
                map.iter()
                    .map(|(id, record)| (UserId::new(*id), record.clone()))
                    .collect()
            })
            .await;
        birthdays.sort_by_key(|(id, record)| (record.month, record.day, *id));
        birthdays
    }

    /// Sorted birthdays with the names of members still in the guild
    pub async fn listed_birthdays(&self, platform: &dyn Platform) -> Vec<ListedBirthday> {
        let mut listed = Vec::new();
        for (user_id, record) in self.sorted_birthdays().await {
            let member_name = platform
                .member_username(self.settings.guild_id, user_id)
                .await
                .unwrap_or_else(|e| {
                    warn!("Failed to look up member {}: {}", user_id, e);
                    None
                });
            listed.push(ListedBirthday {
                month: record.month,
                day: record.day,
                member_name,
            });
        }
        listed
    }

    pub async fn active_grants(&self) -> GrantMap {
        self.grants.snapshot().await
    }

    /// Grant the birthday role to users whose local date matches, and revoke
    /// grants older than the hold period
    ///
    /// Every user is handled independently: a failure is logged and recorded
    /// in the report without stopping the pass.
    pub async fn reconcile(&self, platform: &dyn Platform, now: DateTime<Utc>) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let birthdays = self.birthdays.snapshot().await;
        let grants = self.grants.snapshot().await;

        for (id, record) in &birthdays {
            if grants.contains_key(id) {
                continue;
            }
            let user_id = UserId::new(*id);
            match self.grant_if_birthday(platform, user_id, record, now).await {
                Ok(true) => report.granted.push(user_id),
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to process birthday of user {}: {}", user_id, e);
                    report.failed.push(user_id);
                }
            }
        }

        let grants = self.grants.snapshot().await;
        for (id, granted_at) in &grants {
            if !hold_elapsed(granted_at.0, now.timestamp(), BIRTHDAY_ROLE_HOLD_SECS) {
                continue;
            }
            let user_id = UserId::new(*id);
            match self.revoke_grant(platform, user_id).await {
                Ok(()) => report.revoked.push(user_id),
                Err(e) => {
                    error!("Failed to revoke birthday role of user {}: {}", user_id, e);
                    report.failed.push(user_id);
                }
            }
        }

        report
    }

    async fn grant_if_birthday(
        &self,
        platform: &dyn Platform,
        user_id: UserId,
        record: &BirthdayRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, BotError> {
        let tz = parse_timezone(&record.timezone).map_err(ValidationError::from)?;
        if !matches_birthday(record.month, record.day, tz.local_date(now)) {
            return Ok(false);
        }

        let BirthdaySettings {
            guild_id,
            role_id,
            channel_id,
        } = self.settings;

        if platform.member_username(guild_id, user_id).await?.is_none() {
            debug!("User {} has a birthday today but is not in the guild", user_id);
            return Ok(false);
        }

        platform.add_role(guild_id, user_id, role_id).await?;
        self.grants
            .update(|grants| {
                grants
                    .entry(user_id.get())
                    .or_insert(EpochSeconds(now.timestamp()));
            })
            .await?;
        info!("Granted birthday role to user {}", user_id);

        let announcement = build_birthday_announcement(&user_id.mention().to_string());
        if let Err(e) = platform.send_message(channel_id, &announcement).await {
            warn!("Failed to announce birthday of user {}: {}", user_id, e);
        }

        Ok(true)
    }

    async fn revoke_grant(&self, platform: &dyn Platform, user_id: UserId) -> Result<(), BotError> {
        let BirthdaySettings {
            guild_id, role_id, ..
        } = self.settings;

        if platform.member_has_role(guild_id, user_id, role_id).await? {
            platform.remove_role(guild_id, user_id, role_id).await?;
            info!("Removed birthday role from user {}", user_id);
        }

        self.grants
            .update(|grants| {
                grants.remove(&user_id.get());
            })
            .await?;
        Ok(())
    }
}
