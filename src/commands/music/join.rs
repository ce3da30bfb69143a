use super::*;
use crate::commands::music::utils::embedded_messages;
use poise::serenity_prelude::Mentionable;

/// Join your voice channel and get the shuffled playlist ready
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn join(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    let (channel, songs) = ctx
        .data()
        .music
        .connect(
            ctx.serenity_context(),
            guild_id,
            ctx.author().id,
            ctx.channel_id(),
        )
        .await?;

    ctx.send(embedded_messages::success(format!(
        "🎵 Joined {}! {} songs ready in shuffle mode. Use `start` to begin.",
        channel.mention(),
        songs
    )))
    .await?;

    Ok(())
}
