/// Message service - loads canned templates and sends them under a per-channel cooldown
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, UserId};
use tokio::time::sleep;
use tracing::info;

use crate::{
    clock::Clock,
    constants::{MESSAGE_COOLDOWN, MESSAGE_SEND_DELAY, RATE_LIMIT_BACKOFF},
    error::{BotError, PlatformError, StoreError},
    platform::Platform,
    template::MessageTemplate,
    utils::retry::retry_once,
    utils::validation::{ValidationError, is_safe_template_name},
};

pub struct MessageService {
    owner_id: UserId,
    templates_dir: PathBuf,
    /// Last successful send per destination channel
    cooldowns: DashMap<ChannelId, DateTime<Utc>>,
    clock: Arc<dyn Clock>,
}

impl MessageService {
    pub fn new(owner_id: UserId, templates_dir: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            owner_id,
            templates_dir,
            cooldowns: DashMap::new(),
            clock,
        }
    }

    pub fn is_authorized(&self, user_id: UserId) -> bool {
        user_id == self.owner_id
    }

    /// Time left before `channel_id` accepts another template, if any
    pub fn cooldown_remaining(&self, channel_id: ChannelId) -> Option<Duration> {
        let last = *self.cooldowns.get(&channel_id)?;
        let cooldown = chrono::Duration::from_std(MESSAGE_COOLDOWN).ok()?;
        let elapsed = self.clock.now() - last;
        (cooldown - elapsed).to_std().ok().filter(|d| !d.is_zero())
    }

    /// Load `<templates_dir>/<name>.json`
    pub async fn load_template(&self, name: &str) -> Result<MessageTemplate, BotError> {
        let file_name = format!("{}.json", name);
        if !is_safe_template_name(name) {
            return Err(BotError::NotFound(file_name));
        }

        let path = self.templates_dir.join(&file_name);
        let read = tokio::fs::read_to_string(&path).await;
        let text = match read {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(BotError::NotFound(file_name)),
            Err(source) => return Err(StoreError::Io { path, source }.into()),
        };

        let template = MessageTemplate::from_json(&text)
            .map_err(|source| StoreError::Parse { path, source })?;
        if template.is_empty() {
            return Err(ValidationError::EmptyTemplate(file_name).into());
        }
        Ok(template)
    }

    /// Send a template, retrying once after a rate limit
    ///
    /// The channel's cooldown starts only once the send succeeded.
    pub async fn send_template(
        &self,
        platform: &dyn Platform,
        channel_id: ChannelId,
        template: &MessageTemplate,
    ) -> Result<(), BotError> {
        sleep(MESSAGE_SEND_DELAY).await;

        retry_once(
            "Sending message template",
            RATE_LIMIT_BACKOFF,
            PlatformError::is_rate_limited,
            || platform.send_template(channel_id, template),
        )
        .await?;

        self.cooldowns.insert(channel_id, self.clock.now());
        info!("Sent message template to channel {}", channel_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::platform::fake::{FakePlatform, op};
    use chrono::TimeZone;
    use tempfile::TempDir;

    const OWNER: u64 = 7;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn service(dir: &TempDir, clock: Arc<ManualClock>) -> MessageService {
        MessageService::new(UserId::new(OWNER), dir.path().to_path_buf(), clock)
    }

    fn hello() -> MessageTemplate {
        MessageTemplate::from_json(r#"{"content": "hello"}"#).unwrap()
    }

    #[test]
    fn test_only_owner_is_authorized() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, clock());
        assert!(service.is_authorized(UserId::new(OWNER)));
        assert!(!service.is_authorized(UserId::new(OWNER + 1)));
    }

    #[tokio::test]
    async fn test_load_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("rules.json"),
            r#"{"content": "Be nice", "embeds": [{"title": "Rules"}]}"#,
        )
        .unwrap();
        let service = service(&dir, clock());

        let template = service.load_template("rules").await.unwrap();
        assert_eq!(template.content.as_deref(), Some("Be nice"));
        assert_eq!(template.embeds.len(), 1);
    }

    #[tokio::test]
    async fn test_load_template_not_found() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, clock());

        match service.load_template("missing").await {
            Err(BotError::NotFound(name)) => assert_eq!(name, "missing.json"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_load_template_rejects_paths() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("messages");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.json"), r#"{"content": "x"}"#).unwrap();
        let service = MessageService::new(UserId::new(OWNER), inner, clock());

        for name in ["../secret", "sub/file", "..", ""] {
            assert!(matches!(
                service.load_template(name).await,
                Err(BotError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_load_template_rejects_empty_and_invalid() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("empty.json"), r#"{"tts": true}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let service = service(&dir, clock());

        assert!(matches!(
            service.load_template("empty").await,
            Err(BotError::Validation(ValidationError::EmptyTemplate(_)))
        ));
        assert!(matches!(
            service.load_template("broken").await,
            Err(BotError::Store(StoreError::Parse { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_starts_cooldown() {
        let dir = TempDir::new().unwrap();
        let clock = clock();
        let service = service(&dir, Arc::clone(&clock));
        let platform = FakePlatform::new();
        let channel = ChannelId::new(100);

        assert_eq!(service.cooldown_remaining(channel), None);
        service.send_template(&platform, channel, &hello()).await.unwrap();
        assert_eq!(platform.state().templates.len(), 1);

        assert_eq!(service.cooldown_remaining(channel), Some(MESSAGE_COOLDOWN));
        clock.advance(chrono::Duration::milliseconds(3_500));
        assert_eq!(
            service.cooldown_remaining(channel),
            Some(Duration::from_millis(1_500))
        );
        clock.advance(chrono::Duration::milliseconds(1_500));
        assert_eq!(service.cooldown_remaining(channel), None);

        // Other channels are unaffected
        assert_eq!(service.cooldown_remaining(ChannelId::new(101)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_retries_once_after_rate_limit() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, clock());
        let platform = FakePlatform::new();
        let channel = ChannelId::new(100);

        platform.fail_next(op::SEND_TEMPLATE, PlatformError::RateLimited);
        let started = tokio::time::Instant::now();
        service.send_template(&platform, channel, &hello()).await.unwrap();

        assert!(started.elapsed() >= MESSAGE_SEND_DELAY + RATE_LIMIT_BACKOFF);
        assert_eq!(platform.state().templates.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_leaves_no_cooldown() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, clock());
        let platform = FakePlatform::new();
        let channel = ChannelId::new(100);

        platform.fail_next(op::SEND_TEMPLATE, PlatformError::RateLimited);
        platform.fail_next(op::SEND_TEMPLATE, PlatformError::RateLimited);
        let result = service.send_template(&platform, channel, &hello()).await;

        assert!(matches!(result, Err(BotError::RateLimited)));
        assert!(platform.state().templates.is_empty());
        assert_eq!(service.cooldown_remaining(channel), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, clock());
        let platform = FakePlatform::new();

        platform.fail_next(op::SEND_TEMPLATE, PlatformError::Request("missing access".into()));
        let result = service
            .send_template(&platform, ChannelId::new(100), &hello())
            .await;

        assert!(matches!(result, Err(BotError::Platform(_))));
        assert!(platform.state().templates.is_empty());
    }
}
