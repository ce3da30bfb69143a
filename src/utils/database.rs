//! Provides functions for interacting with the application's SQLite database.
//! Holds the unified history log of AI exchanges (chat and campaign) and the
//! undo stack used by `!undo` / `!redo`.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult, Row, params};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// The kind of exchange a history row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Chat,
    Campaign,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Chat => "chat",
            HistoryKind::Campaign => "campaign",
        }
    }

    fn from_column(value: &str) -> Self {
        match value {
            "campaign" => HistoryKind::Campaign,
            _ => HistoryKind::Chat,
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single row of the history log.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub id: i64,
    pub kind: HistoryKind,
    pub user_id: String,
    pub channel_id: String,
    pub message: String,
    pub response: String,
    /// RFC 3339 timestamp of when the exchange was recorded.
    pub created_at: String,
    pub active: bool,
}

impl HistoryRecord {
    fn from_row(row: &Row<'_>) -> SqlResult<Self> {
        let kind: String = row.get(1)?;
        Ok(Self {
            id: row.get(0)?,
            kind: HistoryKind::from_column(&kind),
            user_id: row.get(2)?,
            channel_id: row.get(3)?,
            message: row.get(4)?,
            response: row.get(5)?,
            created_at: row.get(6)?,
            active: row.get(7)?,
        })
    }
}

const RECORD_COLUMNS: &str =
    "id, kind, user_id, channel_id, message, response, created_at, active";

/// Handle to the on-disk database. Connections are opened per operation.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> SqlResult<Connection> {
        Connection::open(&self.path)
    }

    /// Initializes the database by ensuring the necessary tables are created.
    /// Safe to call repeatedly.
    pub fn init(&self) -> SqlResult<()> {
        let result = self.connect().and_then(|conn| create_tables(&conn));
        match &result {
            Ok(()) => info!("Database ready at {:?}", self.path),
            Err(e) => error!("Failed to create database tables: {}", e),
        }
        result
    }

    pub fn record(
        &self,
        kind: HistoryKind,
        user_id: &str,
        channel_id: &str,
        message: &str,
        response: &str,
    ) -> SqlResult<i64> {
        record(&self.connect()?, kind, user_id, channel_id, message, response)
    }

    pub fn recent(
        &self,
        kind: HistoryKind,
        channel_id: &str,
        limit: usize,
    ) -> SqlResult<Vec<HistoryRecord>> {
        recent(&self.connect()?, kind, channel_id, limit)
    }

    pub fn undo(&self, user_id: &str, channel_id: &str) -> SqlResult<Option<HistoryRecord>> {
        undo(&mut self.connect()?, user_id, channel_id)
    }

    pub fn redo(&self, user_id: &str, channel_id: &str) -> SqlResult<Option<HistoryRecord>> {
        redo(&mut self.connect()?, user_id, channel_id)
    }
}

/// Creates the `history` and `undo_log` tables if they don't exist.
pub fn create_tables(conn: &Connection) -> SqlResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            user_id TEXT NOT NULL,
            channel_id TEXT NOT NULL,
            message TEXT NOT NULL,
            response TEXT NOT NULL,
            created_at TEXT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT 1
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS undo_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            history_id INTEGER NOT NULL REFERENCES history(id),
            user_id TEXT NOT NULL,
            channel_id TEXT NOT NULL,
            undone_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS history_channel_idx ON history (channel_id, kind, active)",
        [],
    )?;

    Ok(())
}

/// Appends an exchange to the history log and returns its row id.
pub fn record(
    conn: &Connection,
    kind: HistoryKind,
    user_id: &str,
    channel_id: &str,
    message: &str,
    response: &str,
) -> SqlResult<i64> {
    conn.execute(
        "INSERT INTO history (kind, user_id, channel_id, message, response, created_at, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        params![
            kind.as_str(),
            user_id,
            channel_id,
            message,
            response,
            Utc::now().to_rfc3339()
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!("Recorded {} exchange {} in channel {}", kind, id, channel_id);
    Ok(id)
}

/// Returns up to `limit` of the most recent active records of `kind` in a channel,
/// oldest first so they can be replayed as conversation context.
pub fn recent(
    conn: &Connection,
    kind: HistoryKind,
    channel_id: &str,
    limit: usize,
) -> SqlResult<Vec<HistoryRecord>> {
    let mut statement = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM history
         WHERE kind = ?1 AND channel_id = ?2 AND active = 1
         ORDER BY id DESC LIMIT ?3"
    ))?;
    let mut records = statement
        .query_map(
            params![kind.as_str(), channel_id, limit as i64],
            HistoryRecord::from_row,
        )?
        .collect::<SqlResult<Vec<_>>>()?;
    records.reverse();
    Ok(records)
}

pub fn find(conn: &Connection, id: i64) -> SqlResult<Option<HistoryRecord>> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM history WHERE id = ?1"),
        [id],
        HistoryRecord::from_row,
    )
    .optional()
}

/// Deactivates the user's most recent active record in the channel, whichever kind it is,
/// and pushes it onto the undo stack.
pub fn undo(
    conn: &mut Connection,
    user_id: &str,
    channel_id: &str,
) -> SqlResult<Option<HistoryRecord>> {
    let tx = conn.transaction()?;

    let target: Option<i64> = tx
        .query_row(
            "SELECT id FROM history
             WHERE user_id = ?1 AND channel_id = ?2 AND active = 1
             ORDER BY id DESC LIMIT 1",
            params![user_id, channel_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(id) = target else {
        debug!("Nothing to undo for user {} in channel {}", user_id, channel_id);
        return Ok(None);
    };

    tx.execute("UPDATE history SET active = 0 WHERE id = ?1", [id])?;
    tx.execute(
        "INSERT INTO undo_log (history_id, user_id, channel_id, undone_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, user_id, channel_id, Utc::now().to_rfc3339()],
    )?;
    let record = find(&tx, id)?;
    tx.commit()?;

    info!("Undid history record {} for user {}", id, user_id);
    Ok(record)
}

/// Pops the user's most recent undo in the channel and reactivates the record.
pub fn redo(
    conn: &mut Connection,
    user_id: &str,
    channel_id: &str,
) -> SqlResult<Option<HistoryRecord>> {
    let tx = conn.transaction()?;

    let entry: Option<(i64, i64)> = tx
        .query_row(
            "SELECT id, history_id FROM undo_log
             WHERE user_id = ?1 AND channel_id = ?2
             ORDER BY id DESC LIMIT 1",
            params![user_id, channel_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((undo_id, history_id)) = entry else {
        debug!("Nothing to redo for user {} in channel {}", user_id, channel_id);
        return Ok(None);
    };

    tx.execute("UPDATE history SET active = 1 WHERE id = ?1", [history_id])?;
    tx.execute("DELETE FROM undo_log WHERE id = ?1", [undo_id])?;
    let record = find(&tx, history_id)?;
    tx.commit()?;

    info!("Redid history record {} for user {}", history_id, user_id);
    Ok(record)
}

/// Module containing tests for the database utility functions.
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    /// Test helper: Creates an in-memory SQLite database with the production schema.
    #[fixture]
    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
        create_tables(&conn).expect("Failed to create tables");
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))
            .unwrap()
    }

    #[rstest]
    fn create_tables_is_idempotent(conn: Connection) {
        create_tables(&conn).expect("second create should be a no-op");
        assert_eq!(count(&conn), 0);
    }

    #[rstest]
    fn recent_returns_oldest_first_and_respects_limit(conn: Connection) {
        for i in 0..5 {
            record(&conn, HistoryKind::Chat, "u1", "c1", &format!("m{i}"), "r").unwrap();
        }
        record(&conn, HistoryKind::Campaign, "u1", "c1", "quest", "r").unwrap();
        record(&conn, HistoryKind::Chat, "u1", "other", "elsewhere", "r").unwrap();

        let rows = recent(&conn, HistoryKind::Chat, "c1", 3).unwrap();
        let messages: Vec<_> = rows.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4"]);
    }

    #[rstest]
    fn undo_picks_most_recent_across_kinds(conn: Connection) {
        let mut conn = conn;
        record(&conn, HistoryKind::Campaign, "u1", "c1", "enter cave", "dark").unwrap();
        let chat_id = record(&conn, HistoryKind::Chat, "u1", "c1", "hi", "hello").unwrap();

        let undone = undo(&mut conn, "u1", "c1").unwrap().unwrap();
        assert_eq!(undone.id, chat_id);
        assert_eq!(undone.kind, HistoryKind::Chat);
        assert!(!undone.active);
    }

    #[rstest]
    fn undo_ignores_other_users(conn: Connection) {
        let mut conn = conn;
        record(&conn, HistoryKind::Chat, "someone-else", "c1", "hi", "hello").unwrap();

        assert_eq!(undo(&mut conn, "u1", "c1").unwrap(), None);
    }

    #[rstest]
    fn chat_records_can_be_redone(conn: Connection) {
        let mut conn = conn;
        let id = record(&conn, HistoryKind::Chat, "u1", "c1", "hi", "hello").unwrap();

        undo(&mut conn, "u1", "c1").unwrap();
        assert!(recent(&conn, HistoryKind::Chat, "c1", 10).unwrap().is_empty());

        let redone = redo(&mut conn, "u1", "c1").unwrap().unwrap();
        assert_eq!(redone.id, id);
        assert!(redone.active);
        assert_eq!(recent(&conn, HistoryKind::Chat, "c1", 10).unwrap().len(), 1);
    }

    #[rstest]
    fn redo_replays_in_reverse_undo_order(conn: Connection) {
        let mut conn = conn;
        let first = record(&conn, HistoryKind::Chat, "u1", "c1", "one", "r").unwrap();
        let second = record(&conn, HistoryKind::Chat, "u1", "c1", "two", "r").unwrap();

        assert_eq!(undo(&mut conn, "u1", "c1").unwrap().unwrap().id, second);
        assert_eq!(undo(&mut conn, "u1", "c1").unwrap().unwrap().id, first);

        assert_eq!(redo(&mut conn, "u1", "c1").unwrap().unwrap().id, first);
        assert_eq!(redo(&mut conn, "u1", "c1").unwrap().unwrap().id, second);
        assert_eq!(redo(&mut conn, "u1", "c1").unwrap(), None);
    }

    #[rstest]
    fn empty_log_has_nothing_to_undo_or_redo(conn: Connection) {
        let mut conn = conn;
        assert_eq!(undo(&mut conn, "u1", "c1").unwrap(), None);
        assert_eq!(redo(&mut conn, "u1", "c1").unwrap(), None);
    }

    #[test]
    fn kind_round_trips_through_column_text() {
        for kind in [HistoryKind::Chat, HistoryKind::Campaign] {
            assert_eq!(HistoryKind::from_column(kind.as_str()), kind);
        }
    }
}
