use super::*;

/// Ask Dogbot a one-off question
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn ask(
    ctx: Context<'_>,
    #[description = "Your question"]
    #[rest]
    question: String,
) -> CommandResult {
    ctx.defer().await?;

    let answer = ctx.data().ai.ask(&question).await?;

    chunk_response(
        ctx,
        format!("**{}**: {question}\n\n**🐶 Dogbot**: {answer}", ctx.author().name),
    )
    .await
}
