use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a slot storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A key-value store of text slots.
///
/// The item store keeps its whole collection in one slot; anything
/// that can get and set a string under a key can back it.
pub trait SlotStorage {
    /// Read a slot, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Insert or replace a slot
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed slot storage.
///
/// The database file is created in the configured data directory:
/// - Linux: ~/.local/share/item-showcase/item_showcase.db
/// - macOS: ~/Library/Application Support/item-showcase/item_showcase.db
/// - Windows: %APPDATA%\item-showcase\item_showcase.db
pub struct SqliteStorage {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteStorage {
    /// File name of the database inside the data directory
    pub const DB_FILE: &'static str = "item_showcase.db";

    /// Open (or create) the database inside `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir).map_err(|source| StorageError::CreateDir {
            path: data_dir.to_path_buf(),
            source,
        })?;

        let db_path = data_dir.join(Self::DB_FILE);
        let conn = Connection::open(&db_path)?;

        tracing::info!(path = %db_path.display(), "opened slot database");

        let storage = SqliteStorage {
            conn,
            db_path: Some(db_path),
        };
        storage.init_schema()?;

        Ok(storage)
    }

    /// A throwaway database that lives only as long as this value
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        let storage = SqliteStorage {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create the slots table if it doesn't exist
    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        tracing::debug!("slot schema initialized");

        Ok(())
    }

    /// Path to the database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

impl SlotStorage for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_slot() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert_eq!(storage.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut storage = SqliteStorage::in_memory().unwrap();

        storage.set("key", "one").unwrap();
        storage.set("key", "two").unwrap();

        assert_eq!(storage.get("key").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("nested").join("data");

        {
            let mut storage = SqliteStorage::open(&data_dir).unwrap();
            assert_eq!(storage.path(), Some(data_dir.join(SqliteStorage::DB_FILE).as_path()));
            storage.set("key", "value").unwrap();
        }

        let storage = SqliteStorage::open(&data_dir).unwrap();
        assert_eq!(storage.get("key").unwrap().as_deref(), Some("value"));
    }
}
