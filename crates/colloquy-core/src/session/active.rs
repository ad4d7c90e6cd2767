//! Shared state of the conversation shown in the workspace.
//!
//! There is exactly one [`ActiveConversationWriter`]; everything else holds an
//! [`ActiveConversationReader`].

use crate::conversation::{ConversationEntries, ConversationEntry, ConversationId};
use crate::error::{ColloquyError, Result};
use serde::Serialize;
use tokio::sync::watch;

/// Entries currently rendered by the chat surface.
///
/// The default value is the empty dialog shown before anything was loaded or
/// when no conversation exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveDialog {
    pub conversation_id: Option<ConversationId>,
    pub entries: Vec<ConversationEntry>,
}

impl ActiveDialog {
    pub fn is_empty(&self) -> bool {
        self.conversation_id.is_none() && self.entries.is_empty()
    }
}

impl From<ConversationEntries> for ActiveDialog {
    fn from(loaded: ConversationEntries) -> Self {
        Self {
            conversation_id: Some(loaded.conversation_id),
            entries: loaded.entries,
        }
    }
}

/// Creates the page-lifetime active conversation state, initialized empty.
pub fn active_conversation() -> (ActiveConversationWriter, ActiveConversationReader) {
    let (tx, rx) = watch::channel(ActiveDialog::default());
    (
        ActiveConversationWriter { tx },
        ActiveConversationReader { rx },
    )
}

/// The single mutation handle.
#[derive(Debug)]
pub struct ActiveConversationWriter {
    tx: watch::Sender<ActiveDialog>,
}

impl ActiveConversationWriter {
    /// Replaces the whole dialog.
    ///
    /// Returns false, and wakes no reader, when `dialog` equals the current
    /// value.
    pub fn commit(&self, dialog: ActiveDialog) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == dialog {
                false
            } else {
                *current = dialog;
                true
            }
        })
    }

    pub fn current(&self) -> ActiveDialog {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> ActiveConversationReader {
        ActiveConversationReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the active conversation.
#[derive(Debug, Clone)]
pub struct ActiveConversationReader {
    rx: watch::Receiver<ActiveDialog>,
}

impl ActiveConversationReader {
    pub fn current(&self) -> ActiveDialog {
        self.rx.borrow().clone()
    }

    /// True when a commit happened since this reader last looked.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Waits for the next commit and returns the new value.
    pub async fn changed(&mut self) -> Result<ActiveDialog> {
        self.rx
            .changed()
            .await
            .map_err(|_| ColloquyError::internal("active conversation writer dropped"))?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::EntryRole;

    fn dialog(id: &str, contents: &[&str]) -> ActiveDialog {
        ConversationEntries::new(
            id,
            contents
                .iter()
                .map(|c| ConversationEntry::new(EntryRole::Assistant, *c))
                .collect(),
        )
        .into()
    }

    #[test]
    fn test_starts_empty() {
        let (writer, reader) = active_conversation();
        assert!(writer.current().is_empty());
        assert!(reader.current().is_empty());
    }

    #[test]
    fn test_commit_is_visible_to_readers() {
        let (writer, reader) = active_conversation();
        let value = dialog("c1", &["hello"]);
        assert!(writer.commit(value.clone()));
        assert!(reader.has_changed());
        assert_eq!(reader.current(), value);
    }

    #[test]
    fn test_equal_commit_does_not_notify() {
        let (writer, mut reader) = active_conversation();
        let value = dialog("c1", &["hello"]);
        writer.commit(value.clone());
        let _ = reader.rx.borrow_and_update();

        assert!(!writer.commit(value));
        assert!(!reader.has_changed());
    }

    #[tokio::test]
    async fn test_changed_yields_new_value() {
        let (writer, mut reader) = active_conversation();
        let value = dialog("c1", &["a", "b"]);
        writer.commit(value.clone());
        assert_eq!(reader.changed().await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_changed_errors_after_writer_dropped() {
        let (writer, mut reader) = active_conversation();
        drop(writer);
        assert!(reader.changed().await.is_err());
    }
}
