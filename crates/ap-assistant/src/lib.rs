//! AutoPick dialogue layer.
//!
//! Wires the pure search core to its two collaborators (the inventory
//! `RecordSource` and a `FallbackResponder`) and keeps a bounded per-user
//! conversation history. Collaborator failures are absorbed here: a dead
//! sheet reads as an empty inventory, a dead completion service yields an
//! apology.

pub mod completion;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod history;
pub mod render;

pub use completion::{ChatCompletionResponder, CompletionConfig, FallbackResponder, MockResponder};
pub use config::{AssistantConfig, LinksConfig, SearchConfig};
pub use dialogue::Assistant;
pub use error::{CompletionError, CompletionResult};
pub use history::{ConversationStore, HistoryConfig};
