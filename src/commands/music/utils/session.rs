//! Per-guild playback state: which entry is current, whether the stream is
//! running, and which track start is still allowed to drive it forward.

use poise::serenity_prelude::{ChannelId, GuildId};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::playlist::{PlaylistEntry, PlaylistError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// What the caller has to do after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Start `entry`; its end notification must carry `generation`.
    Start {
        entry: PlaylistEntry,
        position: usize,
        generation: u64,
    },
    /// The index moved but nothing is playing.
    Queued { entry: PlaylistEntry, position: usize },
    /// Nothing to do.
    Idle,
    /// The session has no entries.
    Empty,
}

/// Who wants to put a freshly resolved track on the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSlot {
    /// A playlist start issued under this generation.
    Playlist(u64),
    /// An out-of-list track that replaces whatever is playing.
    Interlude,
}

/// Snapshot of a session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub current: Option<PlaylistEntry>,
    pub position: usize,
    pub len: usize,
    pub playing: bool,
}

/// Playback state of one guild.
///
/// Every change that abandons the current track bumps `generation`. A track
/// end notification only advances the session when it carries the current
/// generation, so a stopped or skipped track can never advance twice.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    entries: Vec<PlaylistEntry>,
    index: usize,
    playing: bool,
    generation: u64,
    announce_channel: Option<ChannelId>,
}

impl PlaybackSession {
    pub fn new(entries: Vec<PlaylistEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> Option<&PlaylistEntry> {
        self.entries.get(self.index)
    }

    pub fn announce_channel(&self) -> Option<ChannelId> {
        self.announce_channel
    }

    pub fn set_announce_channel(&mut self, channel: ChannelId) {
        self.announce_channel = Some(channel);
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            current: self.current().cloned(),
            position: self.index + 1,
            len: self.len(),
            playing: self.playing,
        }
    }

    /// Marks the session as playing and asks for the current entry.
    pub fn play(&mut self) -> Transition {
        if self.is_empty() {
            return Transition::Empty;
        }
        self.playing = true;
        self.bump();
        self.start_current()
    }

    /// Like [`play`](Self::play), but `None` while the stream is already
    /// running, even if its first track is still resolving.
    pub fn play_if_stopped(&mut self) -> Option<Transition> {
        (!self.playing).then(|| self.play())
    }

    /// Stops the stream. Pending end notifications become stale.
    pub fn stop(&mut self) {
        self.playing = false;
        self.bump();
    }

    /// Moves one entry forward or back, wrapping at both ends.
    pub fn advance(&mut self, direction: Direction) -> Transition {
        if self.is_empty() {
            return Transition::Empty;
        }

        let len = self.len();
        self.index = match direction {
            Direction::Next => (self.index + 1) % len,
            Direction::Previous => (self.index + len - 1) % len,
        };
        self.bump();

        if self.playing {
            self.start_current()
        } else {
            Transition::Queued {
                entry: self.entries[self.index].clone(),
                position: self.index + 1,
            }
        }
    }

    /// Handles the end of the track started under `generation`.
    pub fn on_track_end(&mut self, generation: u64) -> Transition {
        if !self.playing || generation != self.generation {
            debug!(
                "Ignoring end notification for generation {} (current {}, playing {})",
                generation, self.generation, self.playing
            );
            return Transition::Idle;
        }
        self.advance(Direction::Next)
    }

    /// Skips an entry that failed to start, unless something else took over
    /// the session in the meantime.
    pub fn skip_failed(&mut self, generation: u64) -> Transition {
        if !self.playing || generation != self.generation {
            return Transition::Idle;
        }
        self.advance(Direction::Next)
    }

    /// Gives up after every entry failed to start.
    pub fn give_up(&mut self, generation: u64) {
        if generation == self.generation {
            self.stop();
        }
    }

    /// Decides whether a resolved track may start. A playlist start only
    /// wins while its generation is current and the stream is running. An
    /// interlude always wins and invalidates the running track; when it ends
    /// the stream continues only if it was running.
    ///
    /// Returns the generation the started track must report its end with.
    pub fn claim(&mut self, slot: TrackSlot) -> Option<u64> {
        match slot {
            TrackSlot::Playlist(generation) => {
                (self.playing && generation == self.generation).then_some(generation)
            }
            TrackSlot::Interlude => {
                self.bump();
                Some(self.generation)
            }
        }
    }

    pub fn add(&mut self, entry: PlaylistEntry) {
        self.entries.push(entry);
    }

    /// Removes the first occurrence of `entry`, keeping the index on the same
    /// song when possible and resetting it to the first entry otherwise.
    pub fn remove(&mut self, entry: &PlaylistEntry) -> bool {
        let Some(removed) = self.entries.iter().position(|e| e == entry) else {
            return false;
        };
        self.entries.remove(removed);

        if removed < self.index {
            self.index -= 1;
        } else if removed == self.index {
            self.index = 0;
        }
        if self.index >= self.entries.len() {
            self.index = 0;
        }
        true
    }

    fn start_current(&self) -> Transition {
        Transition::Start {
            entry: self.entries[self.index].clone(),
            position: self.index + 1,
            generation: self.generation,
        }
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    library: Vec<PlaylistEntry>,
    sessions: HashMap<GuildId, PlaybackSession>,
}

/// Shared library plus the sessions of every connected guild.
#[derive(Debug)]
pub struct SessionRegistry {
    state: Mutex<RegistryState>,
    shuffle: bool,
}

impl SessionRegistry {
    /// Sessions start from a shuffled copy of `library`.
    pub fn new(library: Vec<PlaylistEntry>) -> Self {
        Self::with_shuffle(library, true)
    }

    /// Sessions start from `library` in its stored order.
    pub fn ordered(library: Vec<PlaylistEntry>) -> Self {
        Self::with_shuffle(library, false)
    }

    fn with_shuffle(library: Vec<PlaylistEntry>, shuffle: bool) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                library,
                sessions: HashMap::new(),
            }),
            shuffle,
        }
    }

    /// Creates the guild's session if it has none yet. Returns its length.
    pub async fn open(&self, guild_id: GuildId, announce_channel: ChannelId) -> usize {
        let mut state = self.state.lock().await;
        let shuffle = self.shuffle;
        let library = state.library.clone();

        let session = state.sessions.entry(guild_id).or_insert_with(|| {
            let mut entries = library;
            if shuffle {
                entries.shuffle(&mut rand::rng());
            }
            info!(
                "Created playback session for guild {} with {} entries",
                guild_id,
                entries.len()
            );
            PlaybackSession::new(entries)
        });
        session.set_announce_channel(announce_channel);
        session.len()
    }

    /// Drops the guild's session. Returns whether one existed.
    pub async fn close(&self, guild_id: GuildId) -> bool {
        let removed = self.state.lock().await.sessions.remove(&guild_id).is_some();
        if removed {
            info!("Removed playback session for guild {}", guild_id);
        }
        removed
    }

    pub async fn contains(&self, guild_id: GuildId) -> bool {
        self.state.lock().await.sessions.contains_key(&guild_id)
    }

    /// Runs `f` against the guild's session while holding the registry lock.
    pub async fn with_session<R>(
        &self,
        guild_id: GuildId,
        f: impl FnOnce(&mut PlaybackSession) -> R,
    ) -> Option<R> {
        let mut state = self.state.lock().await;
        state.sessions.get_mut(&guild_id).map(f)
    }

    /// Claims the guild's session for `slot` and runs `start` with the granted
    /// generation under the registry lock. `None` when the claim is refused or
    /// the guild has no session; `start` does not run then.
    pub async fn claim<R>(
        &self,
        guild_id: GuildId,
        slot: TrackSlot,
        start: impl FnOnce(u64) -> R,
    ) -> Option<R> {
        let mut state = self.state.lock().await;
        let generation = state.sessions.get_mut(&guild_id)?.claim(slot)?;
        Some(start(generation))
    }

    pub async fn status(&self, guild_id: GuildId) -> Option<SessionStatus> {
        self.with_session(guild_id, |session| session.status()).await
    }

    pub async fn library(&self) -> Vec<PlaylistEntry> {
        self.state.lock().await.library.clone()
    }

    /// Appends to the library and to every active session. Returns the new library size.
    pub async fn add(&self, entry: PlaylistEntry) -> usize {
        let mut state = self.state.lock().await;
        for session in state.sessions.values_mut() {
            session.add(entry.clone());
        }
        state.library.push(entry);
        state.library.len()
    }

    /// Removes from the library and from every active session. Returns the new library size.
    pub async fn remove(&self, entry: &PlaylistEntry) -> Result<usize, PlaylistError> {
        let mut state = self.state.lock().await;
        let Some(position) = state.library.iter().position(|e| e == entry) else {
            return Err(PlaylistError::NotInPlaylist(entry.url().to_string()));
        };
        state.library.remove(position);
        for session in state.sessions.values_mut() {
            session.remove(entry);
        }
        Ok(state.library.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn entry(id: &str) -> PlaylistEntry {
        PlaylistEntry::parse(&format!("https://youtu.be/{id}")).unwrap()
    }

    #[fixture]
    fn session() -> PlaybackSession {
        PlaybackSession::new(vec![entry("aaaaaa"), entry("bbbbbb"), entry("cccccc")])
    }

    #[rstest]
    fn play_starts_the_current_entry(mut session: PlaybackSession) {
        let transition = session.play();

        assert!(session.is_playing());
        assert_eq!(
            transition,
            Transition::Start {
                entry: entry("aaaaaa"),
                position: 1,
                generation: session.generation(),
            }
        );
    }

    #[test]
    fn play_on_empty_session() {
        let mut session = PlaybackSession::default();
        assert_eq!(session.play(), Transition::Empty);
        assert!(!session.is_playing());
        assert_eq!(session.advance(Direction::Next), Transition::Empty);
    }

    #[rstest]
    fn advance_wraps_both_ways(mut session: PlaybackSession) {
        session.advance(Direction::Previous);
        assert_eq!(session.index(), 2);
        session.advance(Direction::Next);
        assert_eq!(session.index(), 0);
    }

    #[rstest]
    fn advance_while_stopped_only_queues(mut session: PlaybackSession) {
        assert_matches!(
            session.advance(Direction::Next),
            Transition::Queued { position: 2, .. }
        );
    }

    #[rstest]
    fn stale_end_notification_is_ignored(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };
        session.advance(Direction::Next);

        assert_eq!(session.on_track_end(generation), Transition::Idle);
        assert_eq!(session.index(), 1);
    }

    #[rstest]
    fn end_notification_after_stop_is_ignored(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };
        session.stop();

        assert_eq!(session.on_track_end(generation), Transition::Idle);
        assert_eq!(session.index(), 0);
    }

    #[rstest]
    fn current_end_notification_advances_once(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };

        assert_matches!(
            session.on_track_end(generation),
            Transition::Start { position: 2, .. }
        );
        assert_eq!(session.on_track_end(generation), Transition::Idle);
        assert_eq!(session.index(), 1);
    }

    #[rstest]
    fn interlude_resumes_only_a_running_stream(mut session: PlaybackSession) {
        let interlude = session.claim(TrackSlot::Interlude).unwrap();
        assert_eq!(session.on_track_end(interlude), Transition::Idle);

        session.play();
        let interlude = session.claim(TrackSlot::Interlude).unwrap();
        assert_matches!(
            session.on_track_end(interlude),
            Transition::Start { position: 2, .. }
        );
    }

    #[rstest]
    fn second_start_while_resolving_is_refused(mut session: PlaybackSession) {
        let Some(Transition::Start { generation, .. }) = session.play_if_stopped() else {
            panic!("expected a start");
        };

        assert_eq!(session.play_if_stopped(), None);
        assert_eq!(session.generation(), generation);

        session.stop();
        assert_matches!(session.play_if_stopped(), Some(Transition::Start { .. }));
    }

    #[rstest]
    fn unclaimed_interlude_keeps_the_playlist_track_current(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };

        // The interlude URL failed to resolve, so nothing was claimed
        assert_matches!(
            session.on_track_end(generation),
            Transition::Start { position: 2, .. }
        );
        assert!(session.is_playing());
    }

    #[rstest]
    fn interlude_claim_silences_the_playlist_track(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };
        let interlude = session.claim(TrackSlot::Interlude).unwrap();

        assert_eq!(session.on_track_end(generation), Transition::Idle);
        assert_matches!(
            session.on_track_end(interlude),
            Transition::Start { position: 2, .. }
        );
    }

    #[rstest]
    fn playlist_claim_after_stop_is_refused(mut session: PlaybackSession) {
        let Transition::Start { generation, .. } = session.play() else {
            panic!("expected a start");
        };
        session.stop();

        assert_eq!(session.claim(TrackSlot::Playlist(generation)), None);
    }

    #[rstest]
    fn only_the_newest_playlist_start_may_claim(mut session: PlaybackSession) {
        let Transition::Start { generation: older, .. } = session.play() else {
            panic!("expected a start");
        };
        let Transition::Start { generation: newer, .. } = session.advance(Direction::Next) else {
            panic!("expected a start");
        };

        assert_eq!(session.claim(TrackSlot::Playlist(older)), None);
        assert_eq!(session.claim(TrackSlot::Playlist(newer)), Some(newer));
        assert_eq!(session.generation(), newer);
    }

    #[tokio::test]
    async fn refused_claims_do_not_run_the_start() {
        let registry = SessionRegistry::ordered(vec![entry("aaaaaa"), entry("bbbbbb")]);
        let guild = GuildId::new(9);
        registry.open(guild, ChannelId::new(1)).await;
        let transition = registry.with_session(guild, |s| s.play()).await.unwrap();
        let Transition::Start { generation, .. } = transition else {
            panic!("expected a start");
        };
        registry.with_session(guild, |s| s.stop()).await;

        let mut ran = false;
        let claimed = registry
            .claim(guild, TrackSlot::Playlist(generation), |_| ran = true)
            .await;

        assert_eq!(claimed, None);
        assert!(!ran);
        assert_eq!(
            registry
                .claim(GuildId::new(10), TrackSlot::Interlude, |g| g)
                .await,
            None
        );
    }

    #[rstest]
    fn give_up_respects_newer_generations(mut session: PlaybackSession) {
        session.play();
        let old = session.generation();
        session.advance(Direction::Next);

        session.give_up(old);
        assert!(session.is_playing());

        session.give_up(session.generation());
        assert!(!session.is_playing());
    }

    #[rstest]
    #[case::before_current(0, 2, 1)]
    #[case::after_current(2, 1, 1)]
    #[case::current(1, 1, 0)]
    #[case::current_at_end(2, 2, 0)]
    fn remove_adjusts_index(
        mut session: PlaybackSession,
        #[case] removed: usize,
        #[case] index_before: usize,
        #[case] index_after: usize,
    ) {
        while session.index() != index_before {
            session.advance(Direction::Next);
        }
        let target = session.entries()[removed].clone();

        assert!(session.remove(&target));
        assert_eq!(session.index(), index_after);
        assert_eq!(session.len(), 2);
    }

    #[rstest]
    fn remove_unknown_entry(mut session: PlaybackSession) {
        assert!(!session.remove(&entry("zzzzzz")));
        assert_eq!(session.len(), 3);
    }

    #[tokio::test]
    async fn registry_add_and_remove_reach_every_session() {
        let registry = SessionRegistry::ordered(vec![entry("aaaaaa"), entry("bbbbbb")]);
        let (first, second) = (GuildId::new(1), GuildId::new(2));
        registry.open(first, ChannelId::new(10)).await;
        registry.open(second, ChannelId::new(20)).await;

        assert_eq!(registry.add(entry("cccccc")).await, 3);
        assert_eq!(registry.status(first).await.unwrap().len, 3);
        assert_eq!(registry.status(second).await.unwrap().len, 3);

        assert_eq!(registry.remove(&entry("aaaaaa")).await, Ok(2));
        assert_eq!(registry.status(second).await.unwrap().len, 2);
        assert_matches!(
            registry.remove(&entry("aaaaaa")).await,
            Err(PlaylistError::NotInPlaylist(_))
        );
    }

    #[test]
    fn shuffled_sessions_keep_every_library_entry() {
        let library: Vec<_> = ["aaaaaa", "bbbbbb", "cccccc", "dddddd"]
            .into_iter()
            .map(entry)
            .collect();
        let registry = SessionRegistry::new(library.clone());

        let mut entries = tokio_test::block_on(async {
            registry.open(GuildId::new(3), ChannelId::new(1)).await;
            registry
                .with_session(GuildId::new(3), |s| s.entries().to_vec())
                .await
                .unwrap()
        });

        entries.sort_by(|a, b| a.url().cmp(b.url()));
        assert_eq!(entries, library);
    }

    #[tokio::test]
    async fn registry_open_is_idempotent_and_close_evicts() {
        let registry = SessionRegistry::new(vec![entry("aaaaaa"), entry("bbbbbb")]);
        let guild = GuildId::new(7);

        assert_eq!(registry.open(guild, ChannelId::new(1)).await, 2);
        registry
            .with_session(guild, |s| s.advance(Direction::Next))
            .await;
        registry.open(guild, ChannelId::new(2)).await;

        let (index, channel) = registry
            .with_session(guild, |s| (s.index(), s.announce_channel()))
            .await
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(channel, Some(ChannelId::new(2)));

        assert!(registry.close(guild).await);
        assert!(!registry.contains(guild).await);
        assert!(!registry.close(guild).await);
    }
}
