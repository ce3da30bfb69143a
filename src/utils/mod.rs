//! This module aggregates various utility submodules used throughout the application.

/// Client for the hosted chat-completion API.
pub mod ai_client;
/// Utilities for interacting with the application's SQLite database.
pub mod database;
