use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use std::path::PathBuf;

use crate::app_dirs::AppDirs;

/// One finished round, as kept in the local record book.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub played_at: DateTime<Local>,
    pub source: String,
    pub title: String,
    pub outcome: String,
    pub elapsed_secs: f64,
    pub doc_chars: usize,
    pub start_offset: usize,
    pub tolerance: usize,
    pub wpm: u64,
    pub guesses: usize,
    /// Distance between the tracked offset and the winning guess.
    /// Absent when the round was lost.
    pub distance: Option<usize>,
}

/// Database manager for round records
#[derive(Debug)]
pub struct RoundsDb {
    conn: Connection,
}

impl RoundsDb {
    /// Initialize the database connection and create tables if needed
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("earshot_rounds.db"));

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(&db_path)?;
        create_schema(&conn)?;

        Ok(RoundsDb { conn })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(RoundsDb { conn })
    }

    /// Record a finished round
    pub fn record_round(&self, record: &RoundRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO rounds
            (played_at, source, title, outcome, elapsed_secs, doc_chars, start_offset, tolerance, wpm, guesses, distance)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                record.played_at.to_rfc3339(),
                record.source,
                record.title,
                record.outcome,
                record.elapsed_secs,
                record.doc_chars,
                record.start_offset,
                record.tolerance,
                record.wpm,
                record.guesses,
                record.distance,
            ],
        )?;

        Ok(())
    }

    /// Lifetime win and loss counts
    pub fn totals(&self) -> Result<(i64, i64)> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN outcome = 'won' THEN 1 ELSE 0 END), 0) as wins,
                COALESCE(SUM(CASE WHEN outcome = 'lost' THEN 1 ELSE 0 END), 0) as losses
            FROM rounds
            "#,
        )?;

        let (wins, losses): (i64, i64) =
            stmt.query_row([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        Ok((wins, losses))
    }

    /// The most recent rounds, newest first
    pub fn recent_rounds(&self, limit: usize) -> Result<Vec<RoundRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT played_at, source, title, outcome, elapsed_secs, doc_chars, start_offset, tolerance, wpm, guesses, distance
            FROM rounds
            ORDER BY played_at DESC
            LIMIT ?1
            "#,
        )?;

        let record_iter = stmt.query_map([limit as i64], |row| {
            let played_at_str: String = row.get(0)?;
            let played_at = DateTime::parse_from_rfc3339(&played_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        0,
                        "played_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(RoundRecord {
                played_at,
                source: row.get(1)?,
                title: row.get(2)?,
                outcome: row.get(3)?,
                elapsed_secs: row.get(4)?,
                doc_chars: row.get(5)?,
                start_offset: row.get(6)?,
                tolerance: row.get(7)?,
                wpm: row.get(8)?,
                guesses: row.get(9)?,
                distance: row.get(10)?,
            })
        })?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }

    /// Clear all records (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM rounds", [])?;
        Ok(())
    }
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS rounds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            played_at TEXT NOT NULL,
            source TEXT NOT NULL,
            title TEXT NOT NULL,
            outcome TEXT NOT NULL,
            elapsed_secs REAL NOT NULL,
            doc_chars INTEGER NOT NULL,
            start_offset INTEGER NOT NULL,
            tolerance INTEGER NOT NULL,
            wpm INTEGER NOT NULL,
            guesses INTEGER NOT NULL,
            distance INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_rounds_played_at ON rounds(played_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_rounds_outcome ON rounds(outcome)",
        [],
    )?;

    Ok(())
}
