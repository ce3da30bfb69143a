//! Sample data used across the integration tests

use fake::Fake;
use fake::faker::lorem::en::Sentence;

/// Sample user ID for testing
pub const SAMPLE_USER_ID: &str = "123456789";

/// Another user in the same channel
pub const OTHER_USER_ID: &str = "555555555";

/// Sample channel ID for testing
pub const SAMPLE_CHANNEL_ID: &str = "987654321";

/// Playlist URLs in a fixed order
pub const SAMPLE_PLAYLIST: [&str; 4] = [
    "https://www.youtube.com/watch?v=aaaaaaaaaaa",
    "https://www.youtube.com/watch?v=bbbbbbbbbbb",
    "https://youtu.be/ccccccccccc",
    "https://youtu.be/ddddddddddd",
];

/// A random sentence to use as a chat message or reply
pub fn sentence() -> String {
    Sentence(3..8).fake()
}
