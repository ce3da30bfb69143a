use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::MusicError,
    session::Transition,
};

/// Start streaming the playlist, joining your voice channel if needed
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn start(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;
    let music = &ctx.data().music;

    if !music.sessions.contains(guild_id).await {
        music
            .connect(
                ctx.serenity_context(),
                guild_id,
                ctx.author().id,
                ctx.channel_id(),
            )
            .await?;
    }

    let transition = music
        .sessions
        .with_session(guild_id, |session| session.play_if_stopped())
        .await
        .ok_or(MusicError::NoSession)?;
    let Some(transition) = transition else {
        ctx.send(embedded_messages::error("Music is already playing!"))
            .await?;
        return Ok(());
    };

    if transition == Transition::Empty {
        ctx.send(embedded_messages::error(MusicError::EmptyPlaylist))
            .await?;
        return Ok(());
    }

    ctx.say("🎵 Starting the shuffled playlist...").await?;
    music
        .play_transition(ctx.serenity_context(), guild_id, transition)
        .await?;

    Ok(())
}
