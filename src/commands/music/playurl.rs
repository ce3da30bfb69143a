use super::*;
use crate::commands::music::utils::{embedded_messages, playlist::PlaylistEntry};

/// Play a YouTube URL right now, then return to the playlist
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn playurl(
    ctx: Context<'_>,
    #[description = "YouTube URL to play"]
    #[rest]
    url: String,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    let entry = match PlaylistEntry::parse(&url) {
        Ok(entry) => entry,
        Err(err) => {
            ctx.send(embedded_messages::error(err)).await?;
            return Ok(());
        }
    };

    if !music.sessions.contains(guild_id).await {
        music
            .connect(
                ctx.serenity_context(),
                guild_id,
                ctx.author().id,
                ctx.channel_id(),
            )
            .await?;
    }

    ctx.defer().await?;
    let title = music
        .play_interlude(ctx.serenity_context(), guild_id, entry.clone())
        .await?;

    ctx.send(embedded_messages::success(format!(
        "🎵 Now playing: **[{}]({})**",
        title,
        entry.url()
    )))
    .await?;

    Ok(())
}
