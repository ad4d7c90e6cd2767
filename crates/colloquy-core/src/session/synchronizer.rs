//! Propagation of loaded entries into the active conversation state.

use super::active::{ActiveConversationReader, ActiveConversationWriter, ActiveDialog};
use super::loader::LoadState;
use crate::conversation::ConversationSummary;

/// Result of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The active conversation state was replaced.
    Committed,
    /// A commit was due but the value was already current.
    Unchanged,
    /// Nothing to commit (loading, failed, or data for another conversation).
    Skipped,
}

/// Sole writer of the active conversation state.
///
/// Holds no state of its own beyond the writer: every call re-evaluates the
/// selection and loader state it is given.
#[derive(Debug)]
pub struct SessionSynchronizer {
    writer: ActiveConversationWriter,
}

impl SessionSynchronizer {
    pub fn new(writer: ActiveConversationWriter) -> Self {
        Self { writer }
    }

    pub fn reader(&self) -> ActiveConversationReader {
        self.writer.subscribe()
    }

    pub fn current(&self) -> ActiveDialog {
        self.writer.current()
    }

    pub fn synchronize(
        &self,
        selected: Option<&ConversationSummary>,
        state: &LoadState,
    ) -> SyncOutcome {
        let next = match (selected, state) {
            (None, _) => ActiveDialog::default(),
            (Some(summary), LoadState::Loaded(entries))
                if entries.conversation_id == summary.id =>
            {
                ActiveDialog::from(entries.clone())
            }
            _ => return SyncOutcome::Skipped,
        };

        if self.writer.commit(next) {
            tracing::debug!(
                "[Synchronizer] Committed active conversation {:?}",
                selected.map(|s| s.id.as_str())
            );
            SyncOutcome::Committed
        } else {
            SyncOutcome::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationEntries, ConversationEntry, ConversationId, EntryRole};
    use crate::session::active::active_conversation;
    use chrono::Utc;

    fn summary(id: &str) -> ConversationSummary {
        ConversationSummary::new(id, Utc::now())
    }

    fn loaded(id: &str, contents: &[&str]) -> LoadState {
        LoadState::Loaded(ConversationEntries::new(
            id,
            contents
                .iter()
                .map(|c| ConversationEntry::new(EntryRole::User, *c))
                .collect(),
        ))
    }

    fn synchronizer() -> (SessionSynchronizer, ActiveConversationReader) {
        let (writer, reader) = active_conversation();
        (SessionSynchronizer::new(writer), reader)
    }

    #[test]
    fn test_commits_loaded_entries_for_selection() {
        let (sync, reader) = synchronizer();
        let outcome = sync.synchronize(Some(&summary("c1")), &loaded("c1", &["e1", "e2"]));
        assert_eq!(outcome, SyncOutcome::Committed);

        let active = reader.current();
        assert_eq!(active.conversation_id, Some(ConversationId::new("c1")));
        let contents: Vec<_> = active.entries.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["e1", "e2"]);
    }

    #[test]
    fn test_second_identical_commit_is_unchanged() {
        let (sync, _reader) = synchronizer();
        let state = loaded("c1", &["e1"]);
        assert_eq!(sync.synchronize(Some(&summary("c1")), &state), SyncOutcome::Committed);
        assert_eq!(sync.synchronize(Some(&summary("c1")), &state), SyncOutcome::Unchanged);
    }

    #[test]
    fn test_never_commits_while_loading() {
        let (sync, reader) = synchronizer();
        sync.synchronize(Some(&summary("c1")), &loaded("c1", &["e1"]));

        let loading = LoadState::Loading {
            conversation_id: ConversationId::new("c2"),
        };
        assert_eq!(sync.synchronize(Some(&summary("c2")), &loading), SyncOutcome::Skipped);
        assert_eq!(reader.current().conversation_id, Some(ConversationId::new("c1")));
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let (sync, reader) = synchronizer();
        sync.synchronize(Some(&summary("c1")), &loaded("c1", &["e1"]));

        let failed = LoadState::Failed {
            conversation_id: ConversationId::new("c1"),
            reason: "boom".to_string(),
        };
        assert_eq!(sync.synchronize(Some(&summary("c1")), &failed), SyncOutcome::Skipped);
        assert_eq!(reader.current().entries.len(), 1);
    }

    #[test]
    fn test_data_for_other_conversation_is_not_committed() {
        let (sync, reader) = synchronizer();
        let outcome = sync.synchronize(Some(&summary("c1")), &loaded("c2", &["stale"]));
        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(reader.current().is_empty());
    }

    #[test]
    fn test_no_selection_commits_empty_default() {
        let (sync, reader) = synchronizer();
        sync.synchronize(Some(&summary("c1")), &loaded("c1", &["e1"]));

        assert_eq!(sync.synchronize(None, &LoadState::Idle), SyncOutcome::Committed);
        assert!(reader.current().is_empty());
        assert_eq!(sync.synchronize(None, &LoadState::Idle), SyncOutcome::Unchanged);
    }
}
