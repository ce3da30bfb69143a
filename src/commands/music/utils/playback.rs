//! Starting tracks with skip-on-failure.

use poise::serenity_prelude::{GuildId, async_trait};
use std::time::Duration;
use tracing::{info, warn};

use super::music_manager::{MusicError, MusicResult};
use super::playlist::PlaylistEntry;
use super::session::{SessionRegistry, TrackSlot, Transition};

/// Pause between a failed start and the next attempt.
pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// A track that started successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTrack {
    pub title: String,
    pub url: String,
    pub position: usize,
    pub total: usize,
}

/// Resolves a playlist entry into audio and starts it in the guild's call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackStarter: Send + Sync {
    /// Resolves `entry`, claims the session for `slot` and starts it. Returns
    /// its title. The end of the track must be reported back with the
    /// generation granted by the claim. A refused claim is
    /// [`MusicError::Superseded`] and nothing starts.
    async fn start(
        &self,
        guild_id: GuildId,
        entry: PlaylistEntry,
        slot: TrackSlot,
    ) -> MusicResult<String>;
}

/// Plays the entry named by `transition`, skipping to the next entry whenever
/// one fails to start.
///
/// Each entry of the session is tried at most once. When all of them fail the
/// session is stopped and [`MusicError::PlaylistExhausted`] is returned. If the
/// session changes underneath the loop (stop, skip, leave) the loop ends
/// quietly with `Ok(None)`.
pub async fn start_with_retry<S>(
    registry: &SessionRegistry,
    guild_id: GuildId,
    transition: Transition,
    starter: &S,
    pause: Duration,
) -> MusicResult<Option<StartedTrack>>
where
    S: TrackStarter + ?Sized,
{
    let Transition::Start {
        mut entry,
        mut position,
        mut generation,
    } = transition
    else {
        return Ok(None);
    };

    let total = registry
        .with_session(guild_id, |session| session.len())
        .await
        .ok_or(MusicError::NoSession)?;
    let attempts = total.max(1);

    for attempt in 1..=attempts {
        match starter
            .start(guild_id, entry.clone(), TrackSlot::Playlist(generation))
            .await
        {
            Ok(title) => {
                info!(
                    "Now playing '{}' ({}/{}) in guild {}",
                    title, position, total, guild_id
                );
                return Ok(Some(StartedTrack {
                    title,
                    url: entry.url().to_string(),
                    position,
                    total,
                }));
            }
            Err(MusicError::Superseded) => {
                info!(
                    "Start of {} in guild {} was superseded; leaving playback as is",
                    entry, guild_id
                );
                return Ok(None);
            }
            Err(e) => {
                warn!(
                    "Failed to start {} in guild {} (attempt {}/{}): {}",
                    entry, guild_id, attempt, attempts, e
                );
            }
        }

        if attempt == attempts {
            break;
        }

        tokio::time::sleep(pause).await;

        let next = registry
            .with_session(guild_id, |session| session.skip_failed(generation))
            .await;
        match next {
            Some(Transition::Start {
                entry: next_entry,
                position: next_position,
                generation: next_generation,
            }) => {
                entry = next_entry;
                position = next_position;
                generation = next_generation;
            }
            _ => {
                info!(
                    "Playback in guild {} changed while retrying; abandoning retries",
                    guild_id
                );
                return Ok(None);
            }
        }
    }

    registry
        .with_session(guild_id, |session| session.give_up(generation))
        .await;
    warn!(
        "Every entry failed to start in guild {}; playback stopped",
        guild_id
    );
    Err(MusicError::PlaylistExhausted(attempts))
}
