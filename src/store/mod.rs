//! Per-domain record stores.
//!
//! Every store owns one [`Collection`] loaded once at construction. Mutations
//! build the next version of the list, persist it wholesale, and only then
//! replace the in-memory copy, so a failed write leaves the store unchanged.

pub mod documents;
pub mod emails;
pub mod events;
pub mod profile;
pub mod tasks;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::{AiCommand, CalendarEvent, Document, Email, Task};
use crate::storage::{self, KeyValueStore, StorageError, keys};

pub use documents::DocumentStore;
pub use emails::EmailStore;
pub use events::EventStore;
pub use profile::ProfileStore;
pub use tasks::TaskStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reject blank required text fields before any mutation happens.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// A record kept in a persisted collection.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Storage key that holds the whole collection.
    const KEY: &'static str;

    fn id(&self) -> &str;
}

impl Record for Task {
    const KEY: &'static str = keys::TASKS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for CalendarEvent {
    const KEY: &'static str = keys::CALENDAR_EVENTS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Email {
    const KEY: &'static str = keys::EMAILS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Document {
    const KEY: &'static str = keys::DOCUMENTS;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AiCommand {
    const KEY: &'static str = keys::AI_COMMANDS;

    fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory list of records mirrored to one storage key.
pub struct Collection<R: Record> {
    kv: Arc<dyn KeyValueStore>,
    records: Vec<R>,
}

impl<R: Record> Collection<R> {
    /// Load the collection; unreadable data starts an empty list.
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let records = storage::load_records(kv.as_ref(), R::KEY);
        debug!(key = R::KEY, count = records.len(), "loaded collection");
        Self { kv, records }
    }

    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Append a record and persist.
    pub fn push(&mut self, record: R) -> Result<(), StorageError> {
        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Insert a record at the front and persist.
    pub fn push_front(&mut self, record: R) -> Result<(), StorageError> {
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.push(record);
        next.extend(self.records.iter().cloned());
        self.commit(next)
    }

    /// Apply `change` to the record with `id` and persist.
    ///
    /// Returns `Ok(false)` without writing when no record has that id.
    pub fn update<F>(&mut self, id: &str, change: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut R),
    {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            return Ok(false);
        };
        let mut next = self.records.clone();
        change(&mut next[index]);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove the record with `id` and persist. Absent ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<R> = self
            .records
            .iter()
            .filter(|record| record.id() != id)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    /// Drop the stored key and empty the collection.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        if let Err(e) = self.kv.remove(R::KEY) {
            error!(key = R::KEY, error = %e, "failed to remove collection");
            return Err(e);
        }
        self.records.clear();
        Ok(())
    }

    /// Replace the whole collection and persist.
    pub fn replace(&mut self, next: Vec<R>) -> Result<(), StorageError> {
        self.commit(next)
    }

    fn commit(&mut self, next: Vec<R>) -> Result<(), StorageError> {
        if let Err(e) = storage::save_records(self.kv.as_ref(), R::KEY, &next) {
            error!(key = R::KEY, error = %e, "failed to persist collection");
            return Err(e);
        }
        self.records = next;
        Ok(())
    }
}
