use poise::serenity_prelude as serenity;
use serenity::async_trait;
use serenity::model::channel::ChannelType;
use serenity::model::guild::{Guild, Member};
use serenity::model::id::ChannelId;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::fmt::Display;
use tracing::{error, info, warn};

pub struct Handler;

#[async_trait]
impl serenity::prelude::EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "{} is connected to {} guilds",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let channel_id = match ctx.cache.guild(new_member.guild_id) {
            Some(guild) => welcome_channel(&guild),
            None => None,
        };

        let Some(channel_id) = channel_id else {
            warn!(
                "No channel to welcome {} in guild {}",
                new_member.user.name, new_member.guild_id
            );
            return;
        };

        if let Err(e) = channel_id
            .say(&ctx, welcome_message(new_member.mention()))
            .await
        {
            error!("Failed to welcome {}: {}", new_member.user.name, e);
        }
    }
}

/// The guild's system channel, or its first text channel when none is set.
fn welcome_channel(guild: &Guild) -> Option<ChannelId> {
    guild.system_channel_id.or_else(|| {
        guild
            .channels
            .values()
            .filter(|channel| channel.kind == ChannelType::Text)
            .min_by_key(|channel| (channel.position, channel.id))
            .map(|channel| channel.id)
    })
}

pub fn welcome_message(mention: impl Display) -> String {
    format!("🐶 Woof woof! Welcome to the server, {mention}! Use `!help` to see what I can do.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_mentions_the_member() {
        let message = welcome_message("<@42>");
        assert!(message.contains("Welcome to the server, <@42>!"));
    }
}
