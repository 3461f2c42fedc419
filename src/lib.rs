pub mod assistant;
pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod utils;
pub mod views;
pub mod workspace;

pub use assistant::{Responder, Tone};
pub use config::Config;
pub use models::{CalendarEvent, Document, Email, Task, UserProfile};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use utils::Profile;
pub use workspace::{Workspace, WorkspaceOptions};
