use super::*;

/// Say hello to Dogbot
#[poise::command(prefix_command, slash_command, category = "General")]
pub async fn hello(ctx: Context<'_>) -> CommandResult {
    ctx.say(greeting(&ctx.author().name)).await?;
    Ok(())
}

fn greeting(name: &str) -> String {
    format!("🐶 Woof woof! Hello {name}! I'm Dogbot, your friendly server pup!")
}
