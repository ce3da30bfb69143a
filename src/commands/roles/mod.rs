//! Self-service community roles and moderator role management.

pub(crate) mod moderation;
pub(crate) mod self_service;

use poise::serenity_prelude::{Guild, Permissions, RoleId};
use tracing::warn;

use crate::{CommandResult, Context, Error};

/// Finds a role by name, ignoring case.
pub fn find_role_id(guild: &Guild, name: &str) -> Option<RoleId> {
    guild
        .roles
        .values()
        .find(|role| role.name.eq_ignore_ascii_case(name.trim()))
        .map(|role| role.id)
}

fn lookup_role(ctx: Context<'_>, name: &str) -> Option<RoleId> {
    let guild = ctx.guild()?;
    find_role_id(&guild, name)
}

/// A member moderates when they are an administrator or hold one of the
/// configured moderator roles (compared case-insensitively).
pub fn member_is_moderator<S: AsRef<str>>(
    is_admin: bool,
    member_roles: &[S],
    moderator_roles: &[String],
) -> bool {
    is_admin
        || member_roles.iter().any(|role| {
            moderator_roles
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(role.as_ref()))
        })
}

/// Command check gating role management to moderators.
pub async fn is_moderator(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    let (is_admin, role_names) = {
        let Some(guild) = ctx.guild() else {
            return Ok(false);
        };
        let roles: Vec<_> = member
            .roles
            .iter()
            .filter_map(|id| guild.roles.get(id))
            .collect();
        let is_admin = guild.owner_id == member.user.id
            || roles
                .iter()
                .any(|role| role.has_permission(Permissions::ADMINISTRATOR));
        let names: Vec<String> = roles.iter().map(|role| role.name.clone()).collect();
        (is_admin, names)
    };

    let allowed = member_is_moderator(
        is_admin,
        &role_names,
        &ctx.data().config.roles.moderator_roles,
    );
    if !allowed {
        warn!(
            "{} tried to run {} without moderator rights",
            ctx.author().name,
            ctx.command().name
        );
    }
    Ok(allowed)
}
