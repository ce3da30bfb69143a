use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::CreateEmbed;

use super::playback::StartedTrack;
use super::playlist::PlaylistEntry;
use super::session::SessionStatus;

const GREEN: u32 = 0x00ff00;
const RED: u32 = 0xff0000;
const BLUE: u32 = 0x3498db;

/// Entries shown per `playlist` listing before it is cut off
const PLAYLIST_PAGE: usize = 15;

/// Discord rejects embed descriptions longer than this many characters
const DESCRIPTION_LIMIT: usize = 4096;

/// Room kept for the "... and N more" line
const OVERFLOW_RESERVE: usize = 32;

/// Create an embed for when a song starts
pub fn now_playing(track: &StartedTrack) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("🎵 Now Playing")
        .description(format!("[{}]({})", track.title, track.url))
        .color(GREEN);

    if track.total > 0 {
        embed.field(
            "Position",
            format!("`{}/{}`", track.position, track.total),
            true,
        )
    } else {
        embed.field("Position", "`outside the playlist`", true)
    }
}

/// Create an embed for the `song` command
pub fn current_song(status: &SessionStatus, track: Option<&StartedTrack>) -> CreateEmbed {
    let state = if status.playing { "▶️ Playing" } else { "⏹️ Stopped" };
    let description = match (track, &status.current) {
        (Some(track), _) => format!("[{}]({})", track.title, track.url),
        (None, Some(entry)) => format!("[{}]({})", entry.fallback_title(), entry.url()),
        (None, None) => "Nothing queued".to_string(),
    };

    CreateEmbed::new()
        .title("🎵 Current Song")
        .description(description)
        .field("Position", format!("`{}/{}`", status.position, status.len), true)
        .field("State", state, true)
        .color(BLUE)
}

/// Create an embed listing the shared playlist, with the guild's own
/// position when it has a session
pub fn playlist(entries: &[PlaylistEntry], status: Option<&SessionStatus>) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title(format!("🎵 Playlist - {} songs", entries.len()))
        .description(playlist_listing(entries))
        .color(BLUE);

    match status {
        Some(status) => {
            let state = if status.playing { "▶️ Playing" } else { "⏸️ Stopped" };
            embed
                .field(
                    "Shuffled position",
                    format!("`{}/{}`", status.position, status.len),
                    true,
                )
                .field("State", state, true)
        }
        None => embed.field("State", "Not connected", true),
    }
}

fn playlist_listing(entries: &[PlaylistEntry]) -> String {
    if entries.is_empty() {
        return "📭 The playlist is empty".to_string();
    }

    let mut description = String::new();
    let mut length = 0;
    let mut shown = 0;
    for (index, entry) in entries.iter().take(PLAYLIST_PAGE).enumerate() {
        let line = format!("{}. {}\n", index + 1, entry.url());
        let line_length = line.chars().count();
        if length + line_length > DESCRIPTION_LIMIT - OVERFLOW_RESERVE {
            break;
        }
        description.push_str(&line);
        length += line_length;
        shown += 1;
    }
    if entries.len() > shown {
        description.push_str(&format!("... and {} more", entries.len() - shown));
    }
    description
}

pub fn song_added(entry: &PlaylistEntry, total: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🎵 Added to Playlist")
            .description(entry.url())
            .field("Playlist size", format!("`{total}`"), true)
            .color(GREEN),
    )
}

pub fn song_removed(entry: &PlaylistEntry, total: usize) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .title("🗑️ Removed from Playlist")
            .description(entry.url())
            .field("Playlist size", format!("`{total}`"), true)
            .color(GREEN),
    )
}

pub fn success(message: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(CreateEmbed::new().description(message).color(GREEN))
}

/// Create an error embed, ephemeral for slash commands
pub fn error(message: impl std::fmt::Display) -> CreateReply {
    CreateReply::default()
        .embed(
            CreateEmbed::new()
                .title("❌ Error")
                .description(message.to_string())
                .color(RED),
        )
        .ephemeral(true)
}
