// Command modules
mod birthday;
mod message;

use poise::CreateReply;

use crate::models::{Context, Error};

// Re-export all commands
pub use birthday::{birthday_list, birthday_set};
pub use message::message_send;

/// Reply only visible to the invoking user
async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}
