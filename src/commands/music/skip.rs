use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::MusicError,
    session::{Direction, Transition},
};

/// Skip to the next song in the playlist
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("skip"),
    category = "Music"
)]
pub async fn next(ctx: Context<'_>) -> CommandResult {
    step(ctx, Direction::Next).await
}

/// Go back to the previous song in the playlist
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    aliases("prev"),
    category = "Music"
)]
pub async fn previous(ctx: Context<'_>) -> CommandResult {
    step(ctx, Direction::Previous).await
}

async fn step(ctx: Context<'_>, direction: Direction) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let transition = music
        .sessions
        .with_session(guild_id, |session| session.advance(direction))
        .await
        .ok_or(MusicError::NoSession)?;

    let verb = match direction {
        Direction::Next => "⏭️ Skipping ahead",
        Direction::Previous => "⏮️ Going back",
    };

    match transition {
        Transition::Empty => {
            ctx.send(embedded_messages::error(MusicError::EmptyPlaylist))
                .await?;
        }
        Transition::Queued { entry, position } => {
            ctx.send(embedded_messages::success(format!(
                "{verb}: song {position} ({}) is up next. Use `start` to play it.",
                entry.url()
            )))
            .await?;
        }
        transition @ Transition::Start { .. } => {
            ctx.say(format!("{verb}...")).await?;
            music
                .play_transition(ctx.serenity_context(), guild_id, transition)
                .await?;
        }
        Transition::Idle => {}
    }

    Ok(())
}
