use poise::serenity_prelude::Mentionable;
use tracing::info;

use super::*;

/// Join the Dogs team
#[poise::command(prefix_command, slash_command, guild_only, category = "Roles")]
pub async fn dogsrole(ctx: Context<'_>) -> CommandResult {
    let role = ctx.data().config.roles.dogs_role.clone();
    grant(ctx, &role, "🐶").await
}

/// Join the Cats team
#[poise::command(prefix_command, slash_command, guild_only, category = "Roles")]
pub async fn catsrole(ctx: Context<'_>) -> CommandResult {
    let role = ctx.data().config.roles.cats_role.clone();
    grant(ctx, &role, "🐱").await
}

/// Leave the Dogs team
#[poise::command(prefix_command, slash_command, guild_only, category = "Roles")]
pub async fn removedogsrole(ctx: Context<'_>) -> CommandResult {
    let role = ctx.data().config.roles.dogs_role.clone();
    revoke(ctx, &role).await
}

/// Leave the Cats team
#[poise::command(prefix_command, slash_command, guild_only, category = "Roles")]
pub async fn removecatsrole(ctx: Context<'_>) -> CommandResult {
    let role = ctx.data().config.roles.cats_role.clone();
    revoke(ctx, &role).await
}

async fn grant(ctx: Context<'_>, role_name: &str, emoji: &str) -> CommandResult {
    let Some(role_id) = lookup_role(ctx, role_name) else {
        ctx.say(format!("❌ Role '{role_name}' not found!")).await?;
        return Ok(());
    };
    let member = ctx
        .author_member()
        .await
        .ok_or("Could not load your member profile")?;

    if member.roles.contains(&role_id) {
        ctx.say(format!("{emoji} You already have the {role_name} role!"))
            .await?;
        return Ok(());
    }

    member.add_role(ctx.http(), role_id).await?;
    info!("Gave {} the {} role", ctx.author().name, role_name);
    ctx.say(format!(
        "{emoji} {} is now part of the {role_name} team!",
        ctx.author().mention()
    ))
    .await?;

    Ok(())
}

async fn revoke(ctx: Context<'_>, role_name: &str) -> CommandResult {
    let Some(role_id) = lookup_role(ctx, role_name) else {
        ctx.say(format!("❌ Role '{role_name}' not found!")).await?;
        return Ok(());
    };
    let member = ctx
        .author_member()
        .await
        .ok_or("Could not load your member profile")?;

    if !member.roles.contains(&role_id) {
        ctx.say(format!("You don't have the {role_name} role!"))
            .await?;
        return Ok(());
    }

    member.remove_role(ctx.http(), role_id).await?;
    info!("Removed the {} role from {}", role_name, ctx.author().name);
    ctx.say(format!("✅ Removed the {role_name} role.")).await?;

    Ok(())
}
