//! `SQLite` storage for the joke collection.
//!
//! Owns the schema shared by the server and all batch utilities. Uniqueness
//! of joke text is enforced by the database; duplicate inserts are ignored.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::domain::{AppError, InsertOutcome, Joke, JokeTable, Result, TransferReport};

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Joke repository backed by a single `SQLite` connection.
pub struct JokeStore {
    conn: Connection,
}

impl JokeStore {
    /// Opens or creates the joke database and ensures both tables exist.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create database directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::database)?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(AppError::database)?;

        // WAL lets request threads read while a batch import writes
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(AppError::database)?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Creates `jokes` and `uncleaned_jokes` with identical shape.
    fn init_schema(&self) -> Result<()> {
        for table in JokeTable::ALL {
            self.conn
                .execute_batch(&format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        joke TEXT NOT NULL UNIQUE
                    );"
                ))
                .map_err(AppError::database)?;
        }

        Ok(())
    }

    /// Number of rows in the given table.
    pub fn count(&self, table: JokeTable) -> Result<usize> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|c| usize::try_from(c).unwrap_or_default())
            .map_err(AppError::database)
    }

    /// Fetches the joke with exactly this id.
    pub fn get(&self, id: i64) -> Result<Option<Joke>> {
        self.conn
            .query_row(
                "SELECT id, joke FROM jokes WHERE id = ?1",
                [id],
                Self::row_to_joke,
            )
            .optional()
            .map_err(AppError::database)
    }

    /// Fetches the joke with the smallest id.
    pub fn first(&self) -> Result<Option<Joke>> {
        self.conn
            .query_row(
                "SELECT id, joke FROM jokes ORDER BY id ASC LIMIT 1",
                [],
                Self::row_to_joke,
            )
            .optional()
            .map_err(AppError::database)
    }

    /// Smallest and largest id in `jokes`, or `None` when empty.
    pub fn id_range(&self) -> Result<Option<(i64, i64)>> {
        let (min, max): (Option<i64>, Option<i64>) = self
            .conn
            .query_row("SELECT MIN(id), MAX(id) FROM jokes", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .map_err(AppError::database)?;

        Ok(min.zip(max))
    }

    /// All joke texts of a table in storage (id) order.
    pub fn texts(&self, table: JokeTable) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT joke FROM {table} ORDER BY id ASC"))
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(AppError::database)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)
    }

    /// Starts a batch of ignore-on-duplicate inserts in one transaction.
    ///
    /// Dropping the batch without calling [`JokeBatch::commit`] rolls it back.
    ///
    /// # Errors
    /// Returns error if the transaction cannot be started.
    pub fn begin_batch(&mut self, table: JokeTable) -> Result<JokeBatch<'_>> {
        let tx = self.conn.transaction().map_err(AppError::database)?;
        Ok(JokeBatch { tx, table })
    }

    /// Copies every staged joke into `jokes`, dropping duplicates.
    ///
    /// # Errors
    /// Returns error if any statement or the commit fails; nothing is kept.
    pub fn transfer_staging(&mut self) -> Result<TransferReport> {
        let tx = self.conn.transaction().map_err(AppError::database)?;

        let staged: i64 = tx
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", JokeTable::Staging),
                [],
                |row| row.get(0),
            )
            .map_err(AppError::database)?;

        let inserted = tx
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO {dst}(joke) SELECT joke FROM {src} ORDER BY id ASC",
                    dst = JokeTable::Jokes,
                    src = JokeTable::Staging,
                ),
                [],
            )
            .map_err(AppError::database)?;

        tx.commit().map_err(AppError::database)?;

        Ok(TransferReport {
            staged: usize::try_from(staged).unwrap_or_default(),
            inserted,
            final_count: self.count(JokeTable::Jokes)?,
        })
    }

    /// Direct connection access for tests that need to shape the table.
    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) {
        self.conn.execute_batch(sql).unwrap();
    }

    fn row_to_joke(row: &rusqlite::Row) -> rusqlite::Result<Joke> {
        Ok(Joke {
            id: row.get(0)?,
            text: row.get(1)?,
        })
    }
}

/// An open insert transaction against one joke table.
pub struct JokeBatch<'conn> {
    tx: Transaction<'conn>,
    table: JokeTable,
}

impl JokeBatch<'_> {
    /// Inserts `text` unless it already exists.
    ///
    /// # Errors
    /// Returns error for empty text or any non-duplicate database failure.
    pub fn insert(&self, text: &str) -> Result<InsertOutcome> {
        if text.is_empty() {
            return Err(AppError::InvalidData {
                message: "joke text is empty".into(),
            });
        }

        let mut stmt = self
            .tx
            .prepare_cached(&format!(
                "INSERT OR IGNORE INTO {}(joke) VALUES (?1)",
                self.table
            ))
            .map_err(AppError::database)?;

        let changed = stmt.execute(params![text]).map_err(AppError::database)?;

        Ok(if changed > 0 {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::Duplicate
        })
    }

    /// Commits every insert made through this batch.
    ///
    /// # Errors
    /// Returns error if the commit fails; the transaction is rolled back.
    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(AppError::database)
    }
}
