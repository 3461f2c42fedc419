use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{Collection, StoreResult, require_text};
use crate::models::{NewTask, Task, TaskPatch, new_id};
use crate::storage::KeyValueStore;

pub struct TaskStore {
    tasks: Collection<Task>,
}

impl TaskStore {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            tasks: Collection::load(kv),
        }
    }

    pub fn list(&self) -> &[Task] {
        self.tasks.list()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Create a task with a fresh id and creation time
    pub fn create(&mut self, new_task: NewTask) -> StoreResult<Task> {
        require_text("title", &new_task.title)?;

        let task = new_task.into_task(new_id(), Utc::now());
        self.tasks.push(task.clone())?;
        info!(id = %task.id, "task created");
        Ok(task)
    }

    /// Apply a partial update. Returns `false` when no task has `id`.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> StoreResult<bool> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        Ok(self.tasks.update(id, |task| patch.apply(task))?)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.tasks.remove(id)?)
    }

    /// Flip the completed flag. Returns `false` when no task has `id`.
    pub fn toggle_completion(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.tasks.update(id, |task| task.completed = !task.completed)?)
    }
}
