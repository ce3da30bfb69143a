#![cfg(feature = "music")]

mod common;

use assert_matches::assert_matches;
use common::fixtures::SAMPLE_PLAYLIST;
use dogbot::commands::music::utils::playlist::{PlaylistEntry, PlaylistError, parse_library};
use dogbot::commands::music::utils::session::{Direction, SessionRegistry, Transition};
use poise::serenity_prelude::{ChannelId, GuildId};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

const GUILD: GuildId = GuildId::new(42);
const CHANNEL: ChannelId = ChannelId::new(7);

fn entry(index: usize) -> PlaylistEntry {
    PlaylistEntry::parse(SAMPLE_PLAYLIST[index]).unwrap()
}

#[fixture]
async fn registry() -> SessionRegistry {
    common::init();
    let registry = SessionRegistry::ordered(parse_library(SAMPLE_PLAYLIST));
    registry.open(GUILD, CHANNEL).await;
    registry
}

#[rstest]
#[tokio::test]
async fn next_then_previous_returns_to_the_same_entry(#[future] registry: SessionRegistry) {
    let registry = registry.await;

    for _ in 0..SAMPLE_PLAYLIST.len() + 1 {
        registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;
    }
    let before = registry.status(GUILD).await.unwrap();

    registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;
    registry.with_session(GUILD, |s| s.advance(Direction::Previous)).await;

    assert_eq!(registry.status(GUILD).await.unwrap(), before);
    assert_eq!(before.position, 2);
}

#[rstest]
#[tokio::test]
async fn removing_the_current_entry_resets_to_the_start(#[future] registry: SessionRegistry) {
    let registry = registry.await;
    registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;
    registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;

    registry.remove(&entry(2)).await.unwrap();

    let status = registry.status(GUILD).await.unwrap();
    assert_eq!(status.position, 1);
    assert_eq!(status.current, Some(entry(0)));
    assert_eq!(status.len, SAMPLE_PLAYLIST.len() - 1);
}

#[rstest]
#[tokio::test]
async fn removing_an_earlier_entry_keeps_the_current_song(#[future] registry: SessionRegistry) {
    let registry = registry.await;
    registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;
    registry.with_session(GUILD, |s| s.advance(Direction::Next)).await;

    registry.remove(&entry(0)).await.unwrap();

    let status = registry.status(GUILD).await.unwrap();
    assert_eq!(status.current, Some(entry(2)));
}

#[rstest]
#[tokio::test]
async fn removing_unknown_urls_fails(#[future] registry: SessionRegistry) {
    let registry = registry.await;
    let unknown = PlaylistEntry::parse("https://youtu.be/zzzzzzzzzzz").unwrap();

    assert_matches!(
        registry.remove(&unknown).await,
        Err(PlaylistError::NotInPlaylist(_))
    );
}

#[rstest]
#[tokio::test]
async fn added_entries_join_running_sessions(#[future] registry: SessionRegistry) {
    let registry = registry.await;
    let extra = PlaylistEntry::parse("https://youtu.be/eeeeeeeeeee").unwrap();

    let total = registry.add(extra.clone()).await;

    assert_eq!(total, SAMPLE_PLAYLIST.len() + 1);
    let last = registry
        .with_session(GUILD, |s| s.entries().last().cloned())
        .await
        .flatten();
    assert_eq!(last, Some(extra));
}

#[tokio::test]
async fn playing_an_empty_playlist_is_not_an_error() {
    let registry = SessionRegistry::ordered(Vec::new());
    registry.open(GUILD, CHANNEL).await;

    let transition = registry.with_session(GUILD, |s| s.play()).await;

    assert_eq!(transition, Some(Transition::Empty));
    assert!(!registry.status(GUILD).await.unwrap().playing);
}

#[rstest]
#[tokio::test]
async fn only_the_latest_track_end_advances(#[future] registry: SessionRegistry) {
    let registry = registry.await;
    let Some(Transition::Start { generation: first, .. }) =
        registry.with_session(GUILD, |s| s.play()).await
    else {
        panic!("expected playback to start");
    };

    // A manual skip supersedes the first track
    let Some(Transition::Start { generation: second, .. }) = registry
        .with_session(GUILD, |s| s.advance(Direction::Next))
        .await
    else {
        panic!("expected the skip to start a track");
    };

    let stale = registry.with_session(GUILD, |s| s.on_track_end(first)).await;
    assert_eq!(stale, Some(Transition::Idle));

    let fresh = registry.with_session(GUILD, |s| s.on_track_end(second)).await;
    assert_matches!(fresh, Some(Transition::Start { position: 3, .. }));
}

#[rstest]
#[tokio::test]
async fn leaving_discards_the_session(#[future] registry: SessionRegistry) {
    let registry = registry.await;

    assert!(registry.close(GUILD).await);
    assert_eq!(registry.status(GUILD).await, None);
    assert_eq!(registry.library().await.len(), SAMPLE_PLAYLIST.len());
}
