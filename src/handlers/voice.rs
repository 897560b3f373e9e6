use poise::serenity_prelude::{self as serenity, VoiceState};

use crate::{models::Data, platform::SerenityPlatform};

/// Handle voice state updates (user joins/leaves voice channels)
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<&VoiceState>,
    new_state: &VoiceState,
    data: &Data,
) {
    let Some(guild_id) = new_state.guild_id else {
        return;
    };

    let platform = SerenityPlatform::from_context(ctx);
    let username = new_state.member.as_ref().map(|member| member.user.name.as_str());

    data.voice
        .handle_voice_update(
            &platform,
            guild_id,
            new_state.user_id,
            username,
            old_state.and_then(|old| old.channel_id),
            new_state.channel_id,
        )
        .await;
}
