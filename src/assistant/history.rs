use chrono::Utc;
use std::sync::Arc;

use crate::models::{AiCommand, new_id};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::Collection;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Most recent assistant exchanges, newest first. Display only.
pub struct CommandHistory {
    entries: Collection<AiCommand>,
    limit: usize,
}

impl CommandHistory {
    pub fn load(kv: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        Self {
            entries: Collection::load(kv),
            limit: limit.max(1),
        }
    }

    pub fn list(&self) -> &[AiCommand] {
        let shown = self.entries.len().min(self.limit);
        &self.entries.list()[..shown]
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record an exchange at the front, dropping entries beyond the limit.
    pub fn record(
        &mut self,
        command: impl Into<String>,
        response: impl Into<String>,
    ) -> Result<AiCommand, StorageError> {
        let entry = AiCommand {
            id: new_id(),
            command: command.into(),
            response: response.into(),
            timestamp: Utc::now(),
        };

        let mut next = Vec::with_capacity(self.limit);
        next.push(entry.clone());
        next.extend(self.entries.list().iter().take(self.limit - 1).cloned());
        self.entries.replace(next)?;

        Ok(entry)
    }

    /// Forget every recorded exchange, removing the stored key.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear()
    }
}
