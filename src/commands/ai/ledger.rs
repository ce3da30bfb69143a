use super::*;

/// Undo your most recent chat or campaign entry in this channel
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn undo(ctx: Context<'_>) -> CommandResult {
    let user_id = ctx.author().id.to_string();
    let channel_id = ctx.channel_id().to_string();

    match ctx.data().database.undo(&user_id, &channel_id)? {
        Some(record) => {
            ctx.say(format!(
                "↩️ Undid your last {} entry:\n{}",
                record.kind,
                summarize(&record)
            ))
            .await?;
        }
        None => {
            ctx.say("❌ Nothing to undo!").await?;
        }
    }

    Ok(())
}

/// Restore your most recently undone entry in this channel
#[poise::command(prefix_command, slash_command, category = "AI")]
pub async fn redo(ctx: Context<'_>) -> CommandResult {
    let user_id = ctx.author().id.to_string();
    let channel_id = ctx.channel_id().to_string();

    match ctx.data().database.redo(&user_id, &channel_id)? {
        Some(record) => {
            ctx.say(format!(
                "↪️ Restored your {} entry:\n{}",
                record.kind,
                summarize(&record)
            ))
            .await?;
        }
        None => {
            ctx.say("❌ Nothing to redo!").await?;
        }
    }

    Ok(())
}
