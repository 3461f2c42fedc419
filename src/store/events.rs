use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use super::{Collection, StoreResult, require_text};
use crate::models::{CalendarEvent, EventPatch, NewEvent, new_id};
use crate::storage::KeyValueStore;

pub struct EventStore {
    events: Collection<CalendarEvent>,
}

impl EventStore {
    pub fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            events: Collection::load(kv),
        }
    }

    pub fn list(&self) -> &[CalendarEvent] {
        self.events.list()
    }

    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.get(id)
    }

    /// Create an event. `end_date` before `start_date` is accepted as-is.
    pub fn create(&mut self, new_event: NewEvent) -> StoreResult<CalendarEvent> {
        require_text("title", &new_event.title)?;

        let event = new_event.into_event(new_id());
        self.events.push(event.clone())?;
        info!(id = %event.id, "event created");
        Ok(event)
    }

    /// Create a one-hour event starting an hour after `now`.
    pub fn quick_add(
        &mut self,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<CalendarEvent> {
        self.create(NewEvent::in_an_hour(title, now))
    }

    pub fn update(&mut self, id: &str, patch: EventPatch) -> StoreResult<bool> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        Ok(self.events.update(id, |event| patch.apply(event))?)
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.events.remove(id)?)
    }
}
