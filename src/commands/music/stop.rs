use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicError};

/// Stop the playlist (the bot stays in the voice channel)
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    // Invalidate the running track before stopping it so its end event is ignored
    music
        .sessions
        .with_session(guild_id, |session| session.stop())
        .await
        .ok_or(MusicError::NoSession)?;
    music.stop_track(guild_id);

    ctx.send(embedded_messages::success("⏹️ Stopped the music."))
        .await?;

    Ok(())
}
