use super::*;
use crate::commands::music::utils::embedded_messages;

/// Stop the music and leave the voice channel
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    match ctx
        .data()
        .music
        .disconnect(ctx.serenity_context(), guild_id)
        .await
    {
        Ok(()) => {
            ctx.send(embedded_messages::success("👋 Left the voice channel!"))
                .await?;
        }
        Err(err) => {
            ctx.send(embedded_messages::error(err)).await?;
        }
    }

    Ok(())
}
