use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, warn};

/// Persisted keys. Each holds one JSON document.
pub mod keys {
    pub const TASKS: &str = "tasks";
    pub const CALENDAR_EVENTS: &str = "calendar_events";
    pub const EMAILS: &str = "emails";
    pub const DOCUMENTS: &str = "documents";
    pub const AI_COMMANDS: &str = "ai_commands";
    pub const USER_PROFILE: &str = "user_profile";

    pub const ALL: [&str; 6] = [
        TASKS,
        CALENDAR_EVENTS,
        EMAILS,
        DOCUMENTS,
        AI_COMMANDS,
        USER_PROFILE,
    ];
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create storage directory: {0}")]
    DirectoryError(String),
    #[error("Failed to encode or decode `{key}`: {source}")]
    SerdeError {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage lock poisoned")]
    LockPoisoned,
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Flat string key-value storage.
///
/// Implementations must be safe to share between stores; each write replaces
/// the whole value under a key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Drop every key.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Key-value storage in a single SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and initialize the schema
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        let store = SqliteStore {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        debug!(path = %db_path.display(), "opened key-value store");

        Ok(store)
    }

    /// Open a throwaway store that lives only as long as the value
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = SqliteStore {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        self.lock()?.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// List the keys currently present, sorted
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

/// Process-local storage, used by tests and `--ephemeral` runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Read the JSON array stored under `key`.
///
/// A missing key is an empty collection. Read or decode failures are logged
/// and also yield an empty collection.
pub fn load_records<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match try_load_records(kv, key) {
        Ok(records) => records,
        Err(e) => {
            warn!(key, error = %e, "failed to load collection, starting empty");
            Vec::new()
        }
    }
}

/// Like [`load_records`] but reports failures instead of swallowing them.
pub fn try_load_records<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    match kv.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::SerdeError {
            key: key.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Serialize the full collection and write it under `key`.
pub fn save_records<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(records).map_err(|source| StorageError::SerdeError {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)
}

/// Read a single JSON object. Missing or unreadable values yield `None`.
pub fn load_object<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "failed to read object");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "failed to decode object");
            None
        }
    }
}

pub fn save_object<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::SerdeError {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)
}
