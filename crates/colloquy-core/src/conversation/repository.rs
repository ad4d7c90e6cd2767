//! Conversation provider trait.

use super::model::{ConversationEntries, ConversationId, ConversationSummary};
use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to stored conversations.
///
/// The controller consumes this as two capabilities: enumerating the known
/// conversations, and fetching the full entry list of one conversation by id.
/// Implementations own persistence and any retry policy.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Lists all known conversations.
    ///
    /// The returned collection may be empty, and may be stale with respect to
    /// concurrent writers; order is not significant.
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>>;

    /// Loads the entries of a single conversation.
    ///
    /// # Returns
    ///
    /// - `Ok(ConversationEntries)`: entries keyed to `id`
    /// - `Err(ColloquyError::NotFound)`: no conversation with that id
    /// - `Err(_)`: storage or transport failure
    async fn fetch_entries(&self, id: &ConversationId) -> Result<ConversationEntries>;
}
