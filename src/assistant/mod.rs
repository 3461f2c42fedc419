//! Scripted assistant: keyword classification, canned templates, and the
//! display-only command history.

pub mod context;
pub mod history;
pub mod intent;
pub mod responder;
pub mod templates;

pub use context::AssistantContext;
pub use history::{CommandHistory, DEFAULT_HISTORY_LIMIT};
pub use intent::{Intent, classify};
pub use responder::{Reply, Responder, ResponderDelays, Tone};

/// Shown when a caller-side step around the assistant fails.
pub const TRY_AGAIN: &str = "Произошла ошибка при обработке команды. Попробуйте еще раз.";
