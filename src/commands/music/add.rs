use super::*;
use crate::commands::music::utils::{embedded_messages, playlist::PlaylistEntry};
use tracing::info;

/// Add a YouTube URL to the playlist
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn add(
    ctx: Context<'_>,
    #[description = "YouTube URL of the song"]
    #[rest]
    url: String,
) -> CommandResult {
    let entry = match PlaylistEntry::parse(&url) {
        Ok(entry) => entry,
        Err(err) => {
            ctx.send(embedded_messages::error(err)).await?;
            return Ok(());
        }
    };

    let total = ctx.data().music.sessions.add(entry.clone()).await;
    info!("{} added {} to the playlist", ctx.author().name, entry);

    ctx.send(embedded_messages::song_added(&entry, total)).await?;

    Ok(())
}
