//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: conversation identifiers, summaries and entries
//! - `resolver`: most-recent conversation selection
//! - `repository`: provider trait for listing and fetching conversations

mod model;
mod repository;
mod resolver;

pub use model::{
    ConversationEntries, ConversationEntry, ConversationId, ConversationSummary, EntryRole,
};
pub use repository::ConversationRepository;
pub use resolver::resolve_most_recent;
