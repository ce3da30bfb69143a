use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicError};
use songbird::tracks::PlayMode;

/// Pause the current song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let track = ctx
        .data()
        .music
        .current_track(guild_id)
        .ok_or(MusicError::NothingPlaying)?;

    match track.get_info().await?.playing {
        PlayMode::Play => {
            track.pause()?;
            ctx.send(embedded_messages::success("⏸️ Paused the music."))
                .await?;
        }
        PlayMode::Pause => {
            ctx.send(embedded_messages::error("The music is already paused!"))
                .await?;
        }
        _ => {
            ctx.send(embedded_messages::error(MusicError::NothingPlaying))
                .await?;
        }
    }

    Ok(())
}

/// Resume the paused song
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let track = ctx
        .data()
        .music
        .current_track(guild_id)
        .ok_or(MusicError::NothingPlaying)?;

    match track.get_info().await?.playing {
        PlayMode::Pause => {
            track.play()?;
            ctx.send(embedded_messages::success("▶️ Resumed the music."))
                .await?;
        }
        PlayMode::Play => {
            ctx.send(embedded_messages::error("The music is not paused!"))
                .await?;
        }
        _ => {
            ctx.send(embedded_messages::error(MusicError::NothingPlaying))
                .await?;
        }
    }

    Ok(())
}
