//! Selection of the most recently modified conversation.

use super::model::ConversationSummary;
use std::cmp::Ordering;

/// Returns the conversation with the latest `last_modified_at`.
///
/// Ties on the timestamp go to the lexicographically smallest id, so the
/// result does not depend on the order the provider listed the summaries in.
/// Returns `None` only for an empty slice.
pub fn resolve_most_recent(conversations: &[ConversationSummary]) -> Option<&ConversationSummary> {
    conversations.iter().max_by(|a, b| recency(a, b))
}

fn recency(a: &ConversationSummary, b: &ConversationSummary) -> Ordering {
    a.last_modified_at
        .cmp(&b.last_modified_at)
        // reversed: the smaller id must compare as "greater" to win max_by
        .then_with(|| b.id.cmp(&a.id))
}
