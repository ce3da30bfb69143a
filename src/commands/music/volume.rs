use super::*;
use crate::commands::music::utils::embedded_messages;

/// Set the playback volume (0-100)
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume from 0 to 100"]
    #[min = 0]
    #[max = 100]
    level: u8,
) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if level > 100 {
        ctx.send(embedded_messages::error("Volume must be between 0 and 100!"))
            .await?;
        return Ok(());
    }

    ctx.data()
        .music
        .set_volume(guild_id, f32::from(level) / 100.0)?;

    ctx.send(embedded_messages::success(format!("🔊 Volume set to {level}%")))
        .await?;

    Ok(())
}
