use super::*;
use crate::commands::music::utils::{embedded_messages, playlist::PlaylistEntry};
use futures::{Stream, StreamExt};
use tracing::info;

/// Remove a URL from the playlist
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "URL of the song to remove"]
    #[autocomplete = "autocomplete_playlist"]
    #[rest]
    url: String,
) -> CommandResult {
    let result = match PlaylistEntry::parse(&url) {
        Ok(entry) => ctx
            .data()
            .music
            .sessions
            .remove(&entry)
            .await
            .map(|total| (entry, total)),
        Err(err) => Err(err),
    };

    match result {
        Ok((entry, total)) => {
            info!("{} removed {} from the playlist", ctx.author().name, entry);
            ctx.send(embedded_messages::song_removed(&entry, total))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::error(err)).await?;
        }
    }

    Ok(())
}

/// Suggests playlist URLs containing the partial input.
async fn autocomplete_playlist<'a>(
    ctx: Context<'_>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    let library = ctx.data().music.sessions.library().await;

    futures::stream::iter(library)
        .filter(move |entry| futures::future::ready(entry.url().contains(partial)))
        .map(|entry| entry.url().to_string())
        .take(25)
}
