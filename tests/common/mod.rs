//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across different test categories
#![allow(dead_code)]

pub mod fixtures;
#[cfg(feature = "music")]
pub mod mocks;

use dogbot::utils::database::Database;
use std::path::PathBuf;
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Initialize tracing for tests
pub fn init() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .init();
    });
}

/// A database file in the temp directory, deleted on drop.
pub struct TempDatabase {
    pub database: Database,
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("dogbot-test-{}.db", rand::random::<u64>()));
        let database = Database::new(&path);
        database.init().expect("Failed to create test database");
        Self { database, path }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
