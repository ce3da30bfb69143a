use super::*;

/// Take an action in this channel's tabletop campaign
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn campaign(
    ctx: Context<'_>,
    #[description = "What your character does"]
    #[rest]
    action: String,
) -> CommandResult {
    converse(ctx, HistoryKind::Campaign, &action).await
}
