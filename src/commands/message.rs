use tracing::{error, warn};

use super::reply_ephemeral;
use crate::{
    error::BotError,
    models::{Context, Error},
    platform::SerenityPlatform,
    utils::messages::{
        build_cooldown_message, build_send_error, build_template_not_found, format_error,
        format_success,
    },
};

/// Send a predefined message
#[poise::command(slash_command, guild_only, rename = "messagesend")]
pub async fn message_send(
    ctx: Context<'_>,
    #[description = "Name of the message template, without .json"] filename: String,
) -> Result<(), Error> {
    let service = &ctx.data().messages;

    if !service.is_authorized(ctx.author().id) {
        return reply_ephemeral(ctx, format_error("Not authorized.")).await;
    }

    let channel_id = ctx.channel_id();
    if let Some(remaining) = service.cooldown_remaining(channel_id) {
        return reply_ephemeral(ctx, build_cooldown_message(remaining.as_secs_f64())).await;
    }

    let template = match service.load_template(&filename).await {
        Ok(template) => template,
        Err(BotError::NotFound(file_name)) => {
            return reply_ephemeral(ctx, build_template_not_found(&file_name)).await;
        }
        Err(e) => {
            warn!("Failed to load template {}: {}", filename, e);
            return reply_ephemeral(ctx, build_send_error(&e.to_string())).await;
        }
    };

    ctx.defer_ephemeral().await?;

    let platform = SerenityPlatform::from_context(ctx.serenity_context());
    let reply = match service.send_template(&platform, channel_id, &template).await {
        Ok(()) => format_success("Message sent!"),
        Err(e) => {
            error!("Failed to send template {} to {}: {}", filename, channel_id, e);
            build_send_error(&e.to_string())
        }
    };

    reply_ephemeral(ctx, reply).await
}
