//! Mock implementations for external dependencies

use dogbot::commands::music::utils::music_manager::MusicResult;
use dogbot::commands::music::utils::playback::TrackStarter;
use dogbot::commands::music::utils::playlist::PlaylistEntry;
use dogbot::commands::music::utils::session::TrackSlot;
use mockall::mock;
use poise::serenity_prelude::{GuildId, async_trait};

// Stands in for songbird when starting tracks
mock! {
    pub Starter {}

    #[async_trait]
    impl TrackStarter for Starter {
        async fn start(
            &self,
            guild_id: GuildId,
            entry: PlaylistEntry,
            slot: TrackSlot,
        ) -> MusicResult<String>;
    }
}
