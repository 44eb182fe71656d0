//! # Run History
//!
//! Every finished run is recorded in a small SQLite table so the console can
//! show what was run against which endpoint and how it ended.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::StorageError;

/// Maximum number of runs to retain.
pub const MAX_HISTORY_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed,
}

impl RunOutcome {
    fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Failed => "failed",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw {
            "completed" => RunOutcome::Completed,
            _ => RunOutcome::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub timestamp: u64,
    pub endpoint: String,
    pub selected_count: usize,
    pub outcome: RunOutcome,
    pub summary: Option<String>,
}

pub struct RunHistory {
    conn: Connection,
}

impl RunHistory {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS run_history (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             timestamp INTEGER NOT NULL,
             endpoint TEXT NOT NULL,
             selected_count INTEGER NOT NULL,
             outcome TEXT NOT NULL,
             summary TEXT
           );",
        )?;
        Ok(Self { conn })
    }

    /// Appends a run and drops everything beyond the newest
    /// [`MAX_HISTORY_ENTRIES`].
    pub fn push(&self, record: &RunRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO run_history (timestamp, endpoint, selected_count, outcome, summary)
           VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.timestamp as i64,
                record.endpoint,
                record.selected_count as i64,
                record.outcome.as_str(),
                record.summary,
            ],
        )?;
        self.conn.execute(
            "DELETE FROM run_history WHERE id NOT IN (
             SELECT id FROM run_history ORDER BY id DESC LIMIT ?1
           );",
            params![MAX_HISTORY_ENTRIES as i64],
        )?;
        Ok(())
    }

    /// Most recent first.
    pub fn entries(&self) -> Result<Vec<RunRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, endpoint, selected_count, outcome, summary
           FROM run_history ORDER BY id DESC;",
        )?;
        let rows = stmt.query_map([], |row| {
            let timestamp: i64 = row.get(0)?;
            let selected_count: i64 = row.get(2)?;
            let outcome: String = row.get(3)?;
            Ok(RunRecord {
                timestamp: timestamp.max(0) as u64,
                endpoint: row.get(1)?,
                selected_count: selected_count.max(0) as usize,
                outcome: RunOutcome::parse(&outcome),
                summary: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM run_history;", [])?;
        Ok(())
    }
}
