use poise::serenity_prelude::{Member, Mentionable};
use tracing::info;

use super::*;

/// Give a role to a member (moderators only)
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_moderator",
    category = "Roles"
)]
pub async fn giverole(
    ctx: Context<'_>,
    #[description = "Member to give the role to"] member: Member,
    #[description = "Name of the role"]
    #[rest]
    role: String,
) -> CommandResult {
    let Some(role_id) = lookup_role(ctx, &role) else {
        ctx.say(format!("❌ Role '{role}' not found!")).await?;
        return Ok(());
    };

    if member.roles.contains(&role_id) {
        ctx.say(format!("{} already has the {role} role.", member.mention()))
            .await?;
        return Ok(());
    }

    member.add_role(ctx.http(), role_id).await?;
    info!(
        "{} gave the {} role to {}",
        ctx.author().name,
        role,
        member.user.name
    );
    ctx.say(format!("✅ Gave the {role} role to {}.", member.mention()))
        .await?;

    Ok(())
}

/// Take a role away from a member (moderators only)
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    check = "is_moderator",
    category = "Roles"
)]
pub async fn takerole(
    ctx: Context<'_>,
    #[description = "Member to take the role from"] member: Member,
    #[description = "Name of the role"]
    #[rest]
    role: String,
) -> CommandResult {
    let Some(role_id) = lookup_role(ctx, &role) else {
        ctx.say(format!("❌ Role '{role}' not found!")).await?;
        return Ok(());
    };

    if !member.roles.contains(&role_id) {
        ctx.say(format!("{} doesn't have the {role} role.", member.mention()))
            .await?;
        return Ok(());
    }

    member.remove_role(ctx.http(), role_id).await?;
    info!(
        "{} took the {} role from {}",
        ctx.author().name,
        role,
        member.user.name
    );
    ctx.say(format!("✅ Took the {role} role from {}.", member.mention()))
        .await?;

    Ok(())
}
