//! In-memory [`Platform`] used by the service tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::time::Instant;
use poise::serenity_prelude::{ChannelId, GuildId, RoleId, UserId};

use super::{Platform, TempChannelRequest};
use crate::error::PlatformError;
use crate::template::MessageTemplate;

/// Operation names accepted by [`FakePlatform::fail_next`]
pub mod op {
    pub const MEMBER: &str = "member";
    pub const ADD_ROLE: &str = "add_role";
    pub const REMOVE_ROLE: &str = "remove_role";
    pub const SEND_MESSAGE: &str = "send_message";
    pub const SEND_TEMPLATE: &str = "send_template";
    pub const CREATE_CHANNEL: &str = "create_channel";
    pub const DELETE_CHANNEL: &str = "delete_channel";
    pub const MOVE_MEMBER: &str = "move_member";
    pub const VOICE_COUNT: &str = "voice_count";
}

#[derive(Default)]
pub struct FakeState {
    pub members: HashMap<UserId, String>,
    pub roles: HashSet<(UserId, RoleId)>,
    pub messages: Vec<(ChannelId, String)>,
    pub templates: Vec<(ChannelId, MessageTemplate)>,
    /// Existing voice channels and how many members are connected
    pub voice_channels: HashMap<ChannelId, usize>,
    pub created: Vec<(GuildId, TempChannelRequest)>,
    /// When each channel in `created` was made
    pub creation_times: Vec<Instant>,
    pub deleted: Vec<ChannelId>,
    pub moves: Vec<(UserId, ChannelId)>,
    pub role_adds: usize,
    pub role_removals: usize,
    failures: HashMap<&'static str, VecDeque<PlatformError>>,
    next_channel_id: u64,
}

#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(self, user_id: u64, name: &str) -> Self {
        self.state()
            .members
            .insert(UserId::new(user_id), name.to_string());
        self
    }

    pub fn with_voice_channel(self, channel_id: u64, members: usize) -> Self {
        self.state()
            .voice_channels
            .insert(ChannelId::new(channel_id), members);
        self
    }

    /// Make the next call of `op` fail with `err`
    pub fn fail_next(&self, op: &'static str, err: PlatformError) {
        self.state().failures.entry(op).or_default().push_back(err);
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn check(&self, op: &'static str) -> Result<MutexGuard<'_, FakeState>, PlatformError> {
        let mut state = self.state();
        let failure = state.failures.get_mut(op).and_then(VecDeque::pop_front);
        match failure {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn member_username(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<String>, PlatformError> {
        Ok(self.check(op::MEMBER)?.members.get(&user_id).cloned())
    }

    async fn member_has_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, PlatformError> {
        let state = self.check(op::MEMBER)?;
        Ok(state.members.contains_key(&user_id) && state.roles.contains(&(user_id, role_id)))
    }

    async fn add_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError> {
        let mut state = self.check(op::ADD_ROLE)?;
        state.roles.insert((user_id, role_id));
        state.role_adds += 1;
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<(), PlatformError> {
        let mut state = self.check(op::REMOVE_ROLE)?;
        state.roles.remove(&(user_id, role_id));
        state.role_removals += 1;
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: ChannelId,
        content: &str,
    ) -> Result<(), PlatformError> {
        self.check(op::SEND_MESSAGE)?
            .messages
            .push((channel_id, content.to_string()));
        Ok(())
    }

    async fn send_template(
        &self,
        channel_id: ChannelId,
        template: &MessageTemplate,
    ) -> Result<(), PlatformError> {
        self.check(op::SEND_TEMPLATE)?
            .templates
            .push((channel_id, template.clone()));
        Ok(())
    }

    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        request: &TempChannelRequest,
    ) -> Result<ChannelId, PlatformError> {
        let mut state = self.check(op::CREATE_CHANNEL)?;
        state.next_channel_id += 1;
        let channel_id = ChannelId::new(10_000 + state.next_channel_id);
        state.voice_channels.insert(channel_id, 0);
        state.created.push((guild_id, request.clone()));
        state.creation_times.push(Instant::now());
        Ok(channel_id)
    }

    async fn delete_channel(&self, channel_id: ChannelId) -> Result<(), PlatformError> {
        let mut state = self.check(op::DELETE_CHANNEL)?;
        if state.voice_channels.remove(&channel_id).is_none() {
            return Err(PlatformError::NotFound(format!("channel {}", channel_id)));
        }
        state.deleted.push(channel_id);
        Ok(())
    }

    async fn move_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<(), PlatformError> {
        let mut state = self.check(op::MOVE_MEMBER)?;
        match state.voice_channels.get_mut(&channel_id) {
            Some(count) => *count += 1,
            None => return Err(PlatformError::NotFound(format!("channel {}", channel_id))),
        }
        state.moves.push((user_id, channel_id));
        Ok(())
    }

    async fn voice_member_count(
        &self,
        channel_id: ChannelId,
    ) -> Result<Option<usize>, PlatformError> {
        Ok(self
            .check(op::VOICE_COUNT)?
            .voice_channels
            .get(&channel_id)
            .copied())
    }
}
