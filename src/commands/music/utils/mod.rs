// Export music utilities
pub mod embedded_messages;
pub mod event_handlers;
pub mod music_manager;
pub mod playback;
pub mod playlist;
pub mod session;
