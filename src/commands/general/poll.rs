use poise::{CreateReply, serenity_prelude as serenity};
use serenity::{CreateEmbed, CreateEmbedFooter};

use super::*;

const POLL_REACTIONS: [char; 2] = ['👍', '👎'];

/// Start a yes/no poll
#[poise::command(prefix_command, slash_command, guild_only, category = "General")]
pub async fn poll(
    ctx: Context<'_>,
    #[description = "The question to vote on"]
    #[rest]
    question: String,
) -> CommandResult {
    let embed = poll_embed(&question, &ctx.author().name);
    let reply = ctx.send(CreateReply::default().embed(embed)).await?;
    let message = reply.message().await?;

    for reaction in POLL_REACTIONS {
        message.react(ctx.serenity_context(), reaction).await?;
    }

    Ok(())
}

fn poll_embed(question: &str, author: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("📊 Poll")
        .description(question)
        .footer(CreateEmbedFooter::new(format!("Poll by {author}")))
        .color(0x3498db)
}
