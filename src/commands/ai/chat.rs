use super::*;

/// Chat with Dogbot, who remembers the recent conversation in this channel
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn chat(
    ctx: Context<'_>,
    #[description = "Your chat message"]
    #[rest]
    message: String,
) -> CommandResult {
    converse(ctx, HistoryKind::Chat, &message).await
}
