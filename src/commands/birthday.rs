use poise::CreateReply;
use poise::serenity_prelude::{
    ButtonStyle, Colour, ComponentInteractionCollector, CreateActionRow, CreateButton,
    CreateEmbed, CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use tracing::{error, info};

use super::reply_ephemeral;
use crate::{
    constants::{BIRTHDAY_LIST_TIMEOUT, BIRTHDAY_PAGE_SIZE},
    error::BotError,
    models::{Context, Error},
    platform::SerenityPlatform,
    utils::message_formatter::{BirthdayPage, build_birthday_pages},
    utils::messages::{
        build_birthday_saved, build_invalid_birthday_error, build_storage_error,
        build_wrong_channel_error, format_info,
    },
    utils::pagination::{PageButtons, PageState},
};

const BIRTHDAY_LIST_TITLE: &str = "Birthday List 🎂";

/// Set your birthday
#[poise::command(slash_command, guild_only, rename = "birthdayset")]
pub async fn birthday_set(
    ctx: Context<'_>,
    #[description = "Day of the month"]
    #[min = 1]
    #[max = 31]
    day: u32,
    #[description = "Month (1-12)"]
    #[min = 1]
    #[max = 12]
    month: u32,
    #[description = "Your timezone (Example: UTC+10, America/New_York)"] timezone: String,
) -> Result<(), Error> {
    let service = &ctx.data().birthdays;

    if ctx.channel_id() != service.settings().channel_id {
        return reply_ephemeral(ctx, build_wrong_channel_error("birthdays")).await;
    }

    let reply = match service
        .set_birthday(ctx.author().id, day, month, &timezone)
        .await
    {
        Ok(record) => build_birthday_saved(record.month, record.day, &record.timezone),
        Err(BotError::Validation(e)) => build_invalid_birthday_error(&e.to_string()),
        Err(e) => {
            error!("Failed to save birthday for {}: {}", ctx.author().id, e);
            build_storage_error()
        }
    };

    reply_ephemeral(ctx, reply).await
}

/// List all birthdays
#[poise::command(slash_command, guild_only, rename = "birthdaylist")]
pub async fn birthday_list(ctx: Context<'_>) -> Result<(), Error> {
    let service = &ctx.data().birthdays;

    if ctx.channel_id() != service.settings().channel_id {
        return reply_ephemeral(ctx, build_wrong_channel_error("birthdays")).await;
    }

    if service.birthday_count().await == 0 {
        return reply_ephemeral(ctx, format_info("No birthdays set yet!")).await;
    }

    let platform = SerenityPlatform::from_context(ctx.serenity_context());
    let listed = service.listed_birthdays(&platform).await;
    let pages = build_birthday_pages(&listed, BIRTHDAY_PAGE_SIZE);

    if pages.iter().all(|page| page.visible == 0) {
        return reply_ephemeral(ctx, format_info("No active birthdays found!")).await;
    }

    send_pages(ctx, &pages).await
}

fn page_embed(page: &BirthdayPage) -> CreateEmbed {
    CreateEmbed::new()
        .title(BIRTHDAY_LIST_TITLE)
        .description(&page.description)
        .colour(Colour::PURPLE)
        .footer(CreateEmbedFooter::new(&page.footer))
}

/// Send the first page and let Previous/Next buttons flip through the rest
async fn send_pages(ctx: Context<'_>, pages: &[BirthdayPage]) -> Result<(), Error> {
    let Some(first) = pages.first() else {
        return Ok(());
    };

    let ctx_id = ctx.id();
    let buttons = PageButtons::new(ctx_id);

    let mut reply = CreateReply::default().embed(page_embed(first));
    if pages.len() > 1 {
        reply = reply.components(vec![CreateActionRow::Buttons(vec![
            CreateButton::new(&buttons.previous)
                .label("Previous")
                .style(ButtonStyle::Primary),
            CreateButton::new(&buttons.next)
                .label("Next")
                .style(ButtonStyle::Primary),
        ])]);
    }
    ctx.send(reply).await?;

    if pages.len() <= 1 {
        return Ok(());
    }

    let mut state = PageState::new(pages.len());
    while let Some(press) = ComponentInteractionCollector::new(ctx.serenity_context())
        .filter(move |press| PageButtons::new(ctx_id).contains(&press.data.custom_id))
        .timeout(BIRTHDAY_LIST_TIMEOUT)
        .await
    {
        // Presses past either end are acknowledged with the same page
        buttons.apply(&press.data.custom_id, &mut state);

        let Some(page) = pages.get(state.current()) else {
            continue;
        };
        press
            .create_response(
                ctx.serenity_context(),
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new().embed(page_embed(page)),
                ),
            )
            .await?;
    }

    info!("Birthday list {} stopped responding to buttons", ctx_id);
    Ok(())
}
