//! Per-guild playlist streaming over songbird.

pub(crate) mod add;
pub(crate) mod join;
pub(crate) mod leave;
pub(crate) mod pause;
pub(crate) mod playlist;
pub(crate) mod playurl;
pub(crate) mod remove;
pub(crate) mod skip;
pub(crate) mod song;
pub(crate) mod start;
pub(crate) mod stop;
pub(crate) mod volume;

pub mod utils;

use poise::serenity_prelude::GuildId;

use crate::{CommandResult, Context};
use utils::music_manager::MusicError;

fn guild_id(ctx: Context<'_>) -> Result<GuildId, MusicError> {
    ctx.guild_id().ok_or(MusicError::NotInGuild)
}
