//! Conversation entry loader with a stale-response guard.
//!
//! The loader itself never awaits. `request` and `refresh` hand out a
//! [`LoadTicket`] carrying a fresh [`RequestToken`]; the caller runs
//! [`LoadTicket::fetch`] wherever it likes and feeds the resulting
//! [`LoadOutcome`] back through [`EntryLoader::settle`]. Only the outcome whose
//! token matches the most recent request is applied; everything else is
//! discarded on arrival.

use crate::conversation::{ConversationEntries, ConversationId, ConversationRepository};
use crate::error::Result;
use std::fmt;

/// Monotonically increasing identifier of a fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Observable state of the loader.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No conversation selected; nothing requested.
    #[default]
    Idle,
    /// A fetch for `conversation_id` is in flight.
    Loading { conversation_id: ConversationId },
    /// The most recent fetch succeeded.
    Loaded(ConversationEntries),
    /// The most recent fetch failed. Not retried.
    Failed {
        conversation_id: ConversationId,
        reason: String,
    },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn data(&self) -> Option<&ConversationEntries> {
        match self {
            Self::Loaded(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// A fetch the caller is expected to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: RequestToken,
    pub conversation_id: ConversationId,
}

impl LoadTicket {
    /// Runs the fetch against `repository`.
    pub async fn fetch<R>(self, repository: &R) -> LoadOutcome
    where
        R: ConversationRepository + ?Sized,
    {
        let result = repository.fetch_entries(&self.conversation_id).await;
        LoadOutcome {
            token: self.token,
            conversation_id: self.conversation_id,
            result,
        }
    }
}

/// The settled result of a [`LoadTicket`].
#[derive(Debug)]
pub struct LoadOutcome {
    pub token: RequestToken,
    pub conversation_id: ConversationId,
    pub result: Result<ConversationEntries>,
}

/// What `settle` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome belonged to the latest request and is now the loader state.
    Applied,
    /// The outcome was superseded by a later request and dropped.
    Discarded,
}

/// Loads the entries of the selected conversation.
#[derive(Debug, Default)]
pub struct EntryLoader {
    key: Option<ConversationId>,
    latest: RequestToken,
    state: LoadState,
}

impl EntryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The conversation the loader is currently keyed on.
    pub fn key(&self) -> Option<&ConversationId> {
        self.key.as_ref()
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Re-keys the loader.
    ///
    /// Returns a ticket when a new fetch must be issued. Requesting the current
    /// key is a no-op; requesting `None` disables the loader and supersedes
    /// whatever is in flight.
    pub fn request(&mut self, id: Option<ConversationId>) -> Option<LoadTicket> {
        if self.key == id {
            return None;
        }

        self.latest = self.latest.next();
        self.key = id;

        match self.key.clone() {
            None => {
                tracing::debug!("[Loader] Disabled at {}", self.latest);
                self.state = LoadState::Idle;
                None
            }
            Some(conversation_id) => Some(self.begin(conversation_id)),
        }
    }

    /// Re-issues the fetch for the current key under a new token.
    pub fn refresh(&mut self) -> Option<LoadTicket> {
        let conversation_id = self.key.clone()?;
        self.latest = self.latest.next();
        Some(self.begin(conversation_id))
    }

    /// Applies an outcome if it answers the latest request.
    pub fn settle(&mut self, outcome: LoadOutcome) -> Settlement {
        if outcome.token != self.latest || self.key.as_ref() != Some(&outcome.conversation_id) {
            tracing::debug!(
                "[Loader] Discarding stale response {} for '{}' (latest {})",
                outcome.token,
                outcome.conversation_id,
                self.latest
            );
            return Settlement::Discarded;
        }

        self.state = match outcome.result {
            Ok(entries) if entries.conversation_id == outcome.conversation_id => {
                tracing::debug!(
                    "[Loader] Loaded {} entries for '{}'",
                    entries.len(),
                    outcome.conversation_id
                );
                LoadState::Loaded(entries)
            }
            Ok(entries) => {
                tracing::warn!(
                    "[Loader] Fetch for '{}' returned entries of '{}'",
                    outcome.conversation_id,
                    entries.conversation_id
                );
                LoadState::Failed {
                    reason: format!(
                        "fetch for '{}' returned entries of '{}'",
                        outcome.conversation_id, entries.conversation_id
                    ),
                    conversation_id: outcome.conversation_id,
                }
            }
            Err(e) => {
                tracing::warn!("[Loader] Failed to load '{}': {}", outcome.conversation_id, e);
                LoadState::Failed {
                    conversation_id: outcome.conversation_id,
                    reason: e.to_string(),
                }
            }
        };

        Settlement::Applied
    }

    fn begin(&mut self, conversation_id: ConversationId) -> LoadTicket {
        tracing::debug!("[Loader] Fetching '{}' as {}", conversation_id, self.latest);
        self.state = LoadState::Loading {
            conversation_id: conversation_id.clone(),
        };
        LoadTicket {
            token: self.latest,
            conversation_id,
        }
    }
}
