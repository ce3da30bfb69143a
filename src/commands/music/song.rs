use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicError};
use poise::CreateReply;

/// Show the current song and its position in the playlist
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn song(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let status = music
        .sessions
        .status(guild_id)
        .await
        .ok_or(MusicError::NoSession)?;
    let track = music.now_playing(guild_id);

    ctx.send(CreateReply::default().embed(embedded_messages::current_song(&status, track.as_ref())))
        .await?;

    Ok(())
}
