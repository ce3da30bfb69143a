use poise::{CreateReply, serenity_prelude::CreateEmbed};

use super::*;

/// Show the recent chat history of this channel
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn history(ctx: Context<'_>) -> CommandResult {
    let channel_id = ctx.channel_id().to_string();
    let records = ctx
        .data()
        .database
        .recent(HistoryKind::Chat, &channel_id, CONTEXT_WINDOW)?;

    if records.is_empty() {
        ctx.say("📭 No chat history in this channel yet.").await?;
        return Ok(());
    }

    let description = records
        .iter()
        .map(summarize)
        .collect::<Vec<_>>()
        .join("\n\n");

    let embed = CreateEmbed::new()
        .title(format!("📜 Last {} chat messages", records.len()))
        .description(description)
        .color(0x3498db);

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}
