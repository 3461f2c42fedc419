use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tracing::info;

use crate::assistant::{AssistantContext, CommandHistory, DEFAULT_HISTORY_LIMIT};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::{DocumentStore, EmailStore, EventStore, ProfileStore, TaskStore};

/// Options that shape how a workspace is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceOptions {
    pub seed_demo_inbox: bool,
    pub history_limit: usize,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            seed_demo_inbox: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// All stores for one run, sharing a single key-value backend.
///
/// Built once at startup and passed by reference to whatever needs it.
pub struct Workspace {
    kv: Arc<dyn KeyValueStore>,
    options: WorkspaceOptions,
    pub tasks: TaskStore,
    pub events: EventStore,
    pub emails: EmailStore,
    pub documents: DocumentStore,
    pub history: CommandHistory,
    pub profile: ProfileStore,
}

impl Workspace {
    pub fn open(kv: Arc<dyn KeyValueStore>, options: WorkspaceOptions) -> Self {
        let emails = if options.seed_demo_inbox {
            EmailStore::load_or_seed(kv.clone(), Utc::now())
        } else {
            EmailStore::load(kv.clone())
        };

        let workspace = Self {
            tasks: TaskStore::load(kv.clone()),
            events: EventStore::load(kv.clone()),
            emails,
            documents: DocumentStore::load(kv.clone()),
            history: CommandHistory::load(kv.clone(), options.history_limit),
            profile: ProfileStore::load(kv.clone()),
            kv,
            options,
        };
        info!(
            tasks = workspace.tasks.list().len(),
            events = workspace.events.list().len(),
            emails = workspace.emails.list().len(),
            documents = workspace.documents.list().len(),
            "workspace opened"
        );
        workspace
    }

    /// Context for the assistant, with "today" evaluated in `tz`.
    pub fn assistant_context<Tz: TimeZone>(
        &self,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> AssistantContext<'_> {
        AssistantContext::new(
            self.tasks.list(),
            self.events.list(),
            self.emails.list(),
            self.documents.list(),
            now,
            tz,
        )
    }

    /// Erase every persisted key and reload empty stores.
    ///
    /// The demo inbox is not re-seeded until the next open.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.kv.clear()?;
        let kv = self.kv.clone();
        self.tasks = TaskStore::load(kv.clone());
        self.events = EventStore::load(kv.clone());
        self.emails = EmailStore::load(kv.clone());
        self.documents = DocumentStore::load(kv.clone());
        self.history = CommandHistory::load(kv.clone(), self.options.history_limit);
        self.profile = ProfileStore::load(kv);
        info!("workspace reset");
        Ok(())
    }
}
