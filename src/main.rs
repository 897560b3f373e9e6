mod clock;
mod commands;
mod config;
mod constants;
mod error;
mod handlers;
mod models;
mod platform;
mod schedule;
mod services;
mod store;
mod template;
mod utils;

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    clock::{Clock, SystemClock},
    commands::{birthday_list, birthday_set, message_send},
    config::Config,
    constants::LOG_DIRECTIVE,
    handlers::{handle_cache_ready, handle_voice_state_update},
    models::{Data, Error},
    platform::SerenityPlatform,
    schedule::BirthdayTask,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Load the JSON stores
    let data = match Data::load(&config, Arc::clone(&clock)).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load bot data: {}", e);
            std::process::exit(1);
        }
    };

    // Create and start the bot
    if let Err(e) = start_bot(config, data, clock).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the logging system
fn initialize_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match LOG_DIRECTIVE.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Create and start the Discord bot
async fn start_bot(config: Config, data: Data, clock: Arc<dyn Clock>) -> Result<(), Error> {
    let dev_guild_id = config.dev_guild_id;
    let birthdays = Arc::clone(&data.birthdays);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![birthday_set(), birthday_list(), message_send()],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::VoiceStateUpdate { old, new } => {
                            handle_voice_state_update(ctx, old.as_ref(), new, data).await;
                        }
                        serenity::FullEvent::CacheReady { .. } => {
                            handle_cache_ready(ctx, data).await;
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                // Register commands based on dev_guild_id
                if let Some(guild_id) = dev_guild_id {
                    info!("Registering commands in development guild: {}", guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!("Commands registered in guild {} (instant updates)", guild_id);
                } else {
                    info!("Registering commands globally (may take up to 1 hour)");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Commands registered globally");
                }

                info!("Bot is ready!");
                Ok(data)
            })
        })
        .build();

    // Create client with required intents
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    // Start the birthday role loop
    let birthday_task = BirthdayTask::new(
        birthdays,
        Arc::new(SerenityPlatform::new(client.http.clone(), client.cache.clone())),
        clock,
    )
    .start();

    // Shut the shards down on Ctrl+C so the loop can be stopped below
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    // Start the bot
    info!("Starting bot...");
    let result = client.start().await;

    birthday_task.stop().await;
    result?;

    Ok(())
}
