//! Conversation domain models.
//!
//! Summaries are what the conversation list provider hands out; entries are
//! the full content loaded for a single conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a conversation.
///
/// A weak reference: it names a conversation without owning its summary or
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lightweight listing record for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Unique conversation identifier
    pub id: ConversationId,
    /// Human-readable title
    #[serde(default)]
    pub title: String,
    /// When the conversation was last modified
    pub last_modified_at: DateTime<Utc>,
    /// Number of entries at listing time
    #[serde(default)]
    pub entry_count: usize,
}

impl ConversationSummary {
    pub fn new(id: impl Into<ConversationId>, last_modified_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            last_modified_at,
            entry_count: 0,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Represents the author of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    /// Entry written by the user.
    User,
    /// Entry produced by the language model.
    Assistant,
    /// Application-generated entry.
    System,
}

/// A single turn within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    pub role: EntryRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(role: EntryRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// The full loaded content of one conversation.
///
/// Produced by a fetch keyed on `conversation_id` and forwarded as a whole;
/// the controller never edits it in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntries {
    pub conversation_id: ConversationId,
    #[serde(default)]
    pub entries: Vec<ConversationEntry>,
}

impl ConversationEntries {
    pub fn new(conversation_id: impl Into<ConversationId>, entries: Vec<ConversationEntry>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
