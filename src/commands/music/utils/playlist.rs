//! Playlist entries and the built-in song library.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;
use url::Url;

/// Video hosts the extractor is known to handle well.
pub const KNOWN_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([\w\-]{6,})")
        .expect("video id regex is valid")
});

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("Please provide a YouTube URL!")]
    Empty,

    #[error("Please provide a valid HTTP/HTTPS URL!")]
    NotHttp(String),

    #[error("Please provide a YouTube URL! Other platforms may not work reliably.")]
    UnsupportedHost(String),

    #[error("That URL is not in the playlist!")]
    NotInPlaylist(String),
}

/// A single song in a playlist, stored as its source URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistEntry(String);

impl PlaylistEntry {
    /// Accepts any `http`/`https` URL whose host belongs to a known video host.
    pub fn parse(raw: &str) -> Result<Self, PlaylistError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PlaylistError::Empty);
        }

        let url = Url::parse(raw).map_err(|_| PlaylistError::NotHttp(raw.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PlaylistError::NotHttp(raw.to_string()));
        }

        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let known = KNOWN_HOSTS
            .iter()
            .any(|known| host == *known || host.ends_with(&format!(".{known}")));
        if !known {
            return Err(PlaylistError::UnsupportedHost(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    pub fn video_id(&self) -> Option<&str> {
        VIDEO_ID_REGEX
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Title used before the extractor has reported the real one.
    pub fn fallback_title(&self) -> String {
        match self.video_id() {
            Some(id) => format!("YouTube Video ({id})"),
            None => "Unknown Title".to_string(),
        }
    }
}

impl fmt::Display for PlaylistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses every URL, dropping (and logging) the ones that are not playable entries.
pub fn parse_library<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<PlaylistEntry> {
    urls.into_iter()
        .filter(|url| !url.trim().is_empty())
        .filter_map(|url| match PlaylistEntry::parse(url) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping playlist entry {:?}: {}", url, e);
                None
            }
        })
        .collect()
}

/// The library every guild session starts from.
pub fn default_library() -> Vec<PlaylistEntry> {
    parse_library(DEFAULT_PLAYLIST.iter().copied())
}

pub const DEFAULT_PLAYLIST: &[&str] = &[
    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    "https://www.youtube.com/watch?v=L_jWHffIx5E",
    "https://www.youtube.com/watch?v=9bZkp7q19f0",
    "https://www.youtube.com/watch?v=fJ9rUzIMcZQ",
    "https://www.youtube.com/watch?v=60ItHLz5WEA",
    "https://www.youtube.com/watch?v=Zi_XLOBDo_Y",
    "https://www.youtube.com/watch?v=A_MjCqQoLLA",
    "https://www.youtube.com/watch?v=3MAxltiSJUE",
    "https://youtu.be/P3cffdsEXXw",
    "https://youtu.be/bd-MRcTbx7k",
    "https://youtu.be/AGM8BMqBcTo",
    "https://youtu.be/H5v3kku4y6Q",
    "https://youtu.be/bzZjG9B9_Ug",
    "https://youtu.be/CMWLX0KXwF4",
    "https://youtu.be/jd-qI62gNJM",
    "https://youtu.be/kPa7bsKwL-c",
    "https://youtu.be/9tC-FOXioDo",
    "https://youtu.be/gxmILdU2O6U",
    "https://youtu.be/qod03PVTLqk",
    "https://youtu.be/vuzkn8nQfqY",
    "https://youtu.be/SXF-Eu8XwC8",
    "https://youtu.be/E07s5ZYygMg",
    "https://youtu.be/7IK_safV6pc",
    "https://youtu.be/28tZ-S1LFok",
    "https://youtu.be/TJAfLE39ZZ8",
    "https://youtu.be/HPc8QMycGno",
    "https://youtu.be/mIMMZQJ1H6E",
    "https://youtu.be/m4_9TFeMfJE",
    "https://youtu.be/B9FzVhw8_bY",
    "https://youtu.be/f2JuxM-snGc",
    "https://youtu.be/FpiJLY_ZRqc",
    "https://youtu.be/ASrjoM-rC1U",
    "https://youtu.be/0CGVgAYJyjk",
    "https://youtu.be/FGBhQbmPwH8",
    "https://youtu.be/djV11Xbc914",
    "https://youtu.be/k85mRPqvMbE",
];
