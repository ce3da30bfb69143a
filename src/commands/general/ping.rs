use poise::{CreateReply, serenity_prelude as serenity};
use serenity::CreateEmbed;
use std::time::Duration;

use super::*;

/// Ping the bot to check its latency
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn ping(ctx: Context<'_>) -> CommandResult {
    let latency = get_shard_latency(&ctx)
        .await
        .unwrap_or_default()
        .as_millis();

    let embed = CreateEmbed::new()
        .title("🏓 Pong!")
        .field("API Latency", format!("{} ms", latency), false)
        .color(0x00ff00);

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}

async fn get_shard_latency(ctx: &Context<'_>) -> Option<Duration> {
    let shard_manager = ctx.framework().shard_manager();
    let runners = shard_manager.runners.lock().await;

    // Latency is tracked per shard runner; use the one this command arrived on
    let runner = runners.get(&serenity::ShardId(ctx.serenity_context().shard_id.0))?;

    runner.latency
}
