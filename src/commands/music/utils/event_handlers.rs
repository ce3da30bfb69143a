use poise::serenity_prelude as serenity;
use serenity::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::music_manager::MusicManager;
use super::session::Transition;

/// Event handler for when a song ends (or fails mid-stream)
#[derive(Clone)]
pub struct SongEndNotifier {
    pub ctx: serenity::Context,
    pub manager: Arc<MusicManager>,
    pub guild_id: serenity::GuildId,
    pub generation: u64,
}

#[async_trait]
impl songbird::EventHandler for SongEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(_) = ctx {
            // Songbird's event loop must not wait on the next extraction
            let notifier = self.clone();
            tokio::spawn(async move { notifier.handle_track_end().await });
        }
        None
    }
}

impl SongEndNotifier {
    async fn handle_track_end(&self) {
        let transition = self
            .manager
            .sessions
            .with_session(self.guild_id, |session| session.on_track_end(self.generation))
            .await;

        let Some(transition @ Transition::Start { .. }) = transition else {
            debug!(
                "Track of generation {} ended in guild {}; nothing to advance",
                self.generation, self.guild_id
            );
            return;
        };

        info!("Track ended for guild {}, advancing", self.guild_id);
        if let Err(e) = self
            .manager
            .play_transition(&self.ctx, self.guild_id, transition)
            .await
        {
            warn!("Auto-advance stopped in guild {}: {}", self.guild_id, e);
        }
    }
}
