use super::*;
use crate::commands::music::utils::embedded_messages;
use poise::CreateReply;

/// List the songs in the playlist
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn playlist(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let sessions = &ctx.data().music.sessions;
    let library = sessions.library().await;
    let status = sessions.status(guild_id).await;

    ctx.send(CreateReply::default().embed(embedded_messages::playlist(
        &library,
        status.as_ref(),
    )))
    .await?;

    Ok(())
}
