//! Message Store
//!
//! SQLite-backed append-only log of chat turns.
//! Default location: data/chatbot.db (override with DATABASE_PATH).
//!
//! Every operation opens its own connection and transaction and drops both
//! before returning, so no connection outlives a call. A crash mid-write can
//! lose at most the in-flight turn.

use crate::error::StoreError;
use crate::turn::{Role, Turn};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default database path, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "data/chatbot.db";

/// Durable log of non-system turns
#[derive(Debug, Clone)]
pub struct MessageStore {
    db_path: PathBuf,
}

impl MessageStore {
    /// Point at a database file without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: path.into(),
        }
    }

    /// Point at a database file and provision it
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the parent directory and the `messages` table exist.
    /// Safe to call on an already provisioned store.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::unavailable(&self.db_path, e))?;
            }
        }

        let conn = self.connect()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role TEXT,
                content TEXT
            )
            "#,
            [],
        )
        .map_err(|e| self.unavailable(e))?;

        info!("Message store ready at {}", self.db_path.display());
        Ok(())
    }

    /// Append one turn at the end of the log
    pub fn append(&self, role: Role, content: &str) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(|e| self.unavailable(e))?;
        tx.execute(
            "INSERT INTO messages (role, content) VALUES (?1, ?2)",
            params![role.as_str(), content],
        )
        .map_err(|e| self.unavailable(e))?;
        tx.commit().map_err(|e| self.unavailable(e))?;

        debug!("Appended {} turn ({} bytes)", role, content.len());
        Ok(())
    }

    /// Every stored turn, oldest first
    pub fn read_all(&self) -> Result<Vec<Turn>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, role, content FROM messages ORDER BY id ASC")
            .map_err(|e| self.unavailable(e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(|e| self.unavailable(e))?;

        let mut turns = Vec::new();
        for row in rows {
            let (id, role, content) = row.map_err(|e| self.unavailable(e))?;
            let role_name = role.unwrap_or_default();
            let role = Role::parse(&role_name).ok_or(StoreError::CorruptTurn {
                id,
                role: role_name,
            })?;
            turns.push(Turn::new(role, content.unwrap_or_default()));
        }

        debug!("Read {} turns from {}", turns.len(), self.db_path.display());
        Ok(turns)
    }

    /// Delete every turn. Runs in one transaction, so readers see either the
    /// full log or an empty one.
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction().map_err(|e| self.unavailable(e))?;
        let deleted = tx
            .execute("DELETE FROM messages", [])
            .map_err(|e| self.unavailable(e))?;
        tx.commit().map_err(|e| self.unavailable(e))?;

        info!("Cleared {} turns from message store", deleted);
        Ok(())
    }

    /// Number of stored turns
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .map_err(|e| self.unavailable(e))?;
        Ok(count as usize)
    }

    /// Get database path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.db_path).map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> StoreError {
        StoreError::unavailable(&self.db_path, err)
    }
}
