//! Dogbot: a community Discord bot with roles, AI chat and a shuffled music stream.

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, warn};

pub mod commands;
pub mod config;
pub mod events;
pub mod health;
pub mod utils;

use config::BotConfig;
use utils::ai_client::AiClient;
use utils::database::Database;

#[cfg(feature = "music")]
use commands::music::utils::music_manager::MusicManager;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// User data, which is stored and accessible in all command invocations
pub struct Data {
    pub config: Arc<BotConfig>,
    pub database: Database,
    pub ai: AiClient,
    #[cfg(feature = "music")]
    pub music: Arc<MusicManager>,
}

/// Framework options shared by the binary: commands, prefix and error handling.
pub fn framework_options(config: &BotConfig) -> poise::FrameworkOptions<Data, Error> {
    poise::FrameworkOptions {
        commands: commands::all(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.prefix.clone()),
            case_insensitive_commands: true,
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        ..Default::default()
    }
}

/// Reports command failures to the invoking user and keeps the bot running.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to report command error: {}", e);
            }
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                error!("Check for `{}` failed: {}", ctx.command().name, error);
            }
            if let Err(e) = ctx
                .say("❌ You need to be an administrator or moderator to use this command.")
                .await
            {
                error!("Failed to report check failure: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                warn!("Error while handling error: {}", e);
            }
        }
    }
}

/// Gateway intents needed for prefix commands, member welcomes and voice.
pub fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES
}
