use dashmap::DashMap;
use poise::serenity_prelude::{self as serenity, async_trait};
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::{Compose, YoutubeDl};
use songbird::tracks::TrackHandle;
use songbird::{Call, Event, Songbird, TrackEvent};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::embedded_messages;
use super::event_handlers::SongEndNotifier;
use super::playback::{DEFAULT_RETRY_PAUSE, StartedTrack, TrackStarter, start_with_retry};
use super::playlist::PlaylistEntry;
use super::session::{SessionRegistry, TrackSlot, Transition};

pub const DEFAULT_VOLUME: f32 = 0.5;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("This command only works in a server")]
    NotInGuild,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("I'm not in a voice channel!")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("You need to be in a voice channel first!")]
    UserNotInVoiceChannel,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Nothing is playing right now")]
    NothingPlaying,

    #[error("No music session here. Use `join` first!")]
    NoSession,

    #[error("The playlist is empty!")]
    EmptyPlaylist,

    #[error("Couldn't play any of the {0} songs in the playlist")]
    PlaylistExhausted(usize),

    #[error("Playback changed before the track could start")]
    Superseded,
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Owns the playlist sessions and the songbird track handles of every guild.
pub struct MusicManager {
    pub sessions: SessionRegistry,
    // Handle of the track currently driven by each guild's session
    handles: DashMap<GuildId, TrackHandle>,
    now_playing: DashMap<GuildId, StartedTrack>,
    volumes: DashMap<GuildId, f32>,
    http: reqwest::Client,
    retry_pause: Duration,
}

impl MusicManager {
    pub fn new(library: Vec<PlaylistEntry>) -> Self {
        Self {
            sessions: SessionRegistry::new(library),
            handles: DashMap::new(),
            now_playing: DashMap::new(),
            volumes: DashMap::new(),
            http: reqwest::Client::new(),
            retry_pause: DEFAULT_RETRY_PAUSE,
        }
    }

    /// Get the Songbird voice client from the context
    pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Get the current voice channel call handle
    pub async fn get_call(
        ctx: &Context,
        guild_id: GuildId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;
        songbird.get(guild_id).ok_or(MusicError::NotConnected)
    }

    /// Join a voice channel
    pub async fn join_channel(
        ctx: &Context,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> MusicResult<Arc<SerenityMutex<Call>>> {
        let songbird = Self::get_songbird(ctx).await?;

        songbird
            .join(guild_id, channel_id)
            .await
            .map_err(|e| MusicError::JoinError(e.to_string()))
    }

    /// Leave a voice channel
    pub async fn leave_channel(ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
        let songbird = Self::get_songbird(ctx).await?;

        if songbird.get(guild_id).is_none() {
            return Err(MusicError::NotConnected);
        }

        songbird
            .remove(guild_id)
            .await
            .map_err(|_| MusicError::JoinError("Failed to leave voice channel".to_string()))
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &Context,
        guild_id: GuildId,
        user_id: serenity::UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// Joins the user's voice channel and opens the guild's session.
    /// Returns the voice channel and the number of songs in the session.
    pub async fn connect(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        user_id: serenity::UserId,
        announce_channel: ChannelId,
    ) -> MusicResult<(ChannelId, usize)> {
        let voice_channel = Self::get_user_voice_channel(ctx, guild_id, user_id)?;
        Self::join_channel(ctx, guild_id, voice_channel).await?;
        let songs = self.sessions.open(guild_id, announce_channel).await;
        info!(
            "Joined voice channel {} in guild {} with {} songs",
            voice_channel, guild_id, songs
        );
        Ok((voice_channel, songs))
    }

    /// Forgets the guild's session and leaves voice. A bot that was already
    /// dropped from voice still counts as disconnected once a session existed.
    pub async fn disconnect(&self, ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
        let had_session = self.forget(guild_id).await;
        match Self::leave_channel(ctx, guild_id).await {
            Err(MusicError::NotConnected) if had_session => {
                info!("Guild {} was no longer in voice; session dropped", guild_id);
                Ok(())
            }
            result => result,
        }
    }

    /// Stops the guild's stream and drops everything kept for it.
    /// Returns whether a session existed.
    pub async fn forget(&self, guild_id: GuildId) -> bool {
        self.sessions.with_session(guild_id, |s| s.stop()).await;
        self.stop_track(guild_id);
        self.volumes.remove(&guild_id);
        self.sessions.close(guild_id).await
    }

    pub fn current_track(&self, guild_id: GuildId) -> Option<TrackHandle> {
        self.handles.get(&guild_id).map(|handle| handle.clone())
    }

    pub fn now_playing(&self, guild_id: GuildId) -> Option<StartedTrack> {
        self.now_playing.get(&guild_id).map(|track| track.clone())
    }

    /// Stops and forgets the guild's current track, if any.
    pub fn stop_track(&self, guild_id: GuildId) {
        if let Some((_, handle)) = self.handles.remove(&guild_id) {
            if let Err(e) = handle.stop() {
                debug!("Track in guild {} was already finished: {}", guild_id, e);
            }
        }
        self.now_playing.remove(&guild_id);
    }

    pub fn volume(&self, guild_id: GuildId) -> f32 {
        self.volumes
            .get(&guild_id)
            .map(|v| *v)
            .unwrap_or(DEFAULT_VOLUME)
    }

    /// Stores the guild's volume (0.0 - 1.0) and applies it to the current track.
    pub fn set_volume(&self, guild_id: GuildId, volume: f32) -> MusicResult<()> {
        let volume = volume.clamp(0.0, 1.0);
        self.volumes.insert(guild_id, volume);
        if let Some(handle) = self.current_track(guild_id) {
            handle
                .set_volume(volume)
                .map_err(|e| MusicError::AudioSourceError(e.to_string()))?;
        }
        Ok(())
    }

    /// Acts on a session transition: starts the requested entry (skipping
    /// failures) and announces it.
    pub async fn play_transition(
        self: &Arc<Self>,
        ctx: &Context,
        guild_id: GuildId,
        transition: Transition,
    ) -> MusicResult<Option<StartedTrack>> {
        let starter = SongbirdStarter::new(ctx.clone(), Arc::clone(self));
        let result =
            start_with_retry(&self.sessions, guild_id, transition, &starter, self.retry_pause)
                .await;

        match &result {
            Ok(Some(track)) => {
                self.now_playing.insert(guild_id, track.clone());
                self.announce(ctx, guild_id, track).await;
            }
            Err(_) => self.stop_track(guild_id),
            Ok(None) => {}
        }
        result
    }

    /// Plays one URL outside the playlist. The playlist resumes afterwards if it was running.
    pub async fn play_interlude(
        self: &Arc<Self>,
        ctx: &Context,
        guild_id: GuildId,
        entry: PlaylistEntry,
    ) -> MusicResult<String> {
        let starter = SongbirdStarter::new(ctx.clone(), Arc::clone(self));
        let title = starter
            .start(guild_id, entry.clone(), TrackSlot::Interlude)
            .await?;
        self.now_playing.insert(
            guild_id,
            StartedTrack {
                title: title.clone(),
                url: entry.url().to_string(),
                position: 0,
                total: 0,
            },
        );
        Ok(title)
    }

    async fn announce(&self, ctx: &Context, guild_id: GuildId, track: &StartedTrack) {
        let Some(Some(channel)) = self
            .sessions
            .with_session(guild_id, |s| s.announce_channel())
            .await
        else {
            return;
        };

        let message = serenity::CreateMessage::new().embed(embedded_messages::now_playing(track));
        if let Err(e) = channel.send_message(ctx, message).await {
            warn!("Failed to announce track in channel {}: {}", channel, e);
        }
    }
}

/// Starts entries through songbird using `yt-dlp` for extraction.
pub struct SongbirdStarter {
    ctx: Context,
    manager: Arc<MusicManager>,
}

impl SongbirdStarter {
    pub fn new(ctx: Context, manager: Arc<MusicManager>) -> Self {
        Self { ctx, manager }
    }
}

#[async_trait]
impl TrackStarter for SongbirdStarter {
    async fn start(
        &self,
        guild_id: GuildId,
        entry: PlaylistEntry,
        slot: TrackSlot,
    ) -> MusicResult<String> {
        let call = MusicManager::get_call(&self.ctx, guild_id).await?;

        let mut source = YoutubeDl::new(self.manager.http.clone(), entry.url().to_string());
        // Resolving metadata up front surfaces unavailable videos before anything stops
        let metadata = source
            .aux_metadata()
            .await
            .map_err(|e| MusicError::AudioSourceError(e.to_string()))?;
        let title = metadata.title.unwrap_or_else(|| entry.fallback_title());

        // The session may have moved on during extraction; swap tracks only
        // while the claim holds the registry lock
        let mut handler = call.lock().await;
        let claimed = self
            .manager
            .sessions
            .claim(guild_id, slot, |generation| -> MusicResult<()> {
                self.manager.stop_track(guild_id);
                let handle = handler.play_input(source.into());
                self.manager.handles.insert(guild_id, handle.clone());

                let notifier = SongEndNotifier {
                    ctx: self.ctx.clone(),
                    manager: Arc::clone(&self.manager),
                    guild_id,
                    generation,
                };
                for event in [TrackEvent::End, TrackEvent::Error] {
                    handle
                        .add_event(Event::Track(event), notifier.clone())
                        .map_err(|e| MusicError::AudioSourceError(e.to_string()))?;
                }
                if let Err(e) = handle.set_volume(self.manager.volume(guild_id)) {
                    warn!("Failed to set volume in guild {}: {}", guild_id, e);
                }
                Ok(())
            })
            .await;
        drop(handler);

        match claimed {
            Some(started) => started.map(|()| title),
            None if slot == TrackSlot::Interlude => Err(MusicError::NoSession),
            None => {
                debug!("Dropping resolved {} in guild {}", entry, guild_id);
                Err(MusicError::Superseded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(id: &str) -> PlaylistEntry {
        PlaylistEntry::parse(&format!("https://youtu.be/{id}")).unwrap()
    }

    #[tokio::test]
    async fn forget_evicts_the_session_and_guild_state() {
        let manager = MusicManager::new(vec![entry("aaaaaa"), entry("bbbbbb")]);
        let guild = GuildId::new(5);
        manager.sessions.open(guild, ChannelId::new(1)).await;
        manager.sessions.with_session(guild, |s| s.play()).await;
        manager.set_volume(guild, 0.2).unwrap();

        assert!(manager.forget(guild).await);

        assert!(!manager.sessions.contains(guild).await);
        assert_eq!(manager.volume(guild), DEFAULT_VOLUME);
        assert!(manager.now_playing(guild).is_none());
        assert!(manager.current_track(guild).is_none());
    }

    #[tokio::test]
    async fn forget_without_a_session() {
        let manager = MusicManager::new(vec![entry("aaaaaa")]);
        assert!(!manager.forget(GuildId::new(6)).await);
    }
}
