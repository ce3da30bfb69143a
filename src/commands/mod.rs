//! This module aggregates all the command modules for the bot.

/// Commands backed by the hosted AI model (ask, chat, campaign, history, undo/redo).
pub(crate) mod ai;
/// General purpose commands (e.g., hello, ping, poll, help).
pub(crate) mod general;
/// Self-service and moderator role commands.
pub(crate) mod roles;

/// Commands related to music playback (requires the `music` feature).
#[cfg(feature = "music")]
pub mod music;

use crate::{Data, Error};

/// Every command the framework registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    use ai::{ask::*, campaign::*, chat::*, history::*, ledger::*};
    use general::{hello::*, help::*, ping::*, poll::*};
    use roles::{moderation::*, self_service::*};

    #[allow(unused_mut)]
    let mut commands = vec![
        // Default commands
        register(),
        help(),
        // General commands
        hello(),
        ping(),
        poll(),
        // Role commands
        dogsrole(),
        catsrole(),
        removedogsrole(),
        removecatsrole(),
        giverole(),
        takerole(),
        // AI-centric commands
        ask(),
        chat(),
        history(),
        campaign(),
        undo(),
        redo(),
    ];

    #[cfg(feature = "music")]
    {
        use music::{
            add::*, join::*, leave::*, pause::*, playlist::*, playurl::*, remove::*, skip::*,
            song::*, start::*, stop::*, volume::*,
        };

        commands.extend(vec![
            join(),
            leave(),
            start(),
            stop(),
            next(),
            previous(),
            song(),
            add(),
            remove(),
            playlist(),
            playurl(),
            pause(),
            resume(),
            volume(),
        ]);
    }

    commands
}
