//! Directory-backed conversation repository.
//!
//! Each conversation is one TOML file named after its id:
//!
//! ```text
//! conversations/
//! ├── 0b6f...e1.toml
//! └── 9a2c...44.toml
//! ```

use crate::paths::ColloquyPaths;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_core::conversation::{
    ConversationEntries, ConversationEntry, ConversationId, ConversationRepository,
    ConversationSummary,
};
use colloquy_core::error::{ColloquyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stored form of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: ConversationId,
    #[serde(default)]
    pub title: String,
    pub last_modified_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<ConversationEntry>,
}

impl ConversationRecord {
    /// Creates an empty conversation with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(Uuid::new_v4().to_string()),
            title: title.into(),
            last_modified_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry and bumps the modification time.
    pub fn push(&mut self, entry: ConversationEntry) {
        self.last_modified_at = self.last_modified_at.max(entry.created_at);
        self.entries.push(entry);
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_modified_at: self.last_modified_at,
            entry_count: self.entries.len(),
        }
    }
}

impl From<ConversationRecord> for ConversationEntries {
    fn from(record: ConversationRecord) -> Self {
        ConversationEntries::new(record.id, record.entries)
    }
}

/// Conversation repository reading one TOML file per conversation.
pub struct DirConversationRepository {
    dir: PathBuf,
}

impl DirConversationRepository {
    /// Creates a repository over `dir`. The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Creates a repository at the location resolved by `paths`.
    pub fn from_paths(paths: &ColloquyPaths) -> Result<Self> {
        Ok(Self::new(paths.conversations_dir()?))
    }

    /// Writes a conversation, replacing any previous version atomically.
    pub async fn save(&self, record: &ConversationRecord) -> Result<()> {
        let path = self.record_path(&record.id)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let content = toml::to_string_pretty(record)?;
        let tmp_path = self.dir.join(format!(".{}.toml.tmp", record.id));
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("[Conversations] Saved '{}' to {:?}", record.id, path);
        Ok(())
    }

    fn record_path(&self, id: &ConversationId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.starts_with('.') {
            return Err(ColloquyError::data_access(format!(
                "Invalid conversation id '{}'",
                raw
            )));
        }
        Ok(self.dir.join(format!("{}.toml", raw)))
    }

    async fn read_record(path: &Path) -> Result<ConversationRecord> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&content)?)
    }
}

#[async_trait]
impl ConversationRepository for DirConversationRepository {
    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let is_record = path.extension().is_some_and(|ext| ext == "toml")
                && !entry.file_name().to_string_lossy().starts_with('.');
            if !is_record {
                continue;
            }

            match Self::read_record(&path).await {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => {
                    tracing::warn!("[Conversations] Skipping unreadable {:?}: {}", path, e);
                }
            }
        }

        Ok(summaries)
    }

    async fn fetch_entries(&self, id: &ConversationId) -> Result<ConversationEntries> {
        let path = self.record_path(id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(ColloquyError::not_found("conversation", id.as_str()));
        }

        let record = Self::read_record(&path).await?;
        if &record.id != id {
            return Err(ColloquyError::data_access(format!(
                "File for '{}' holds conversation '{}'",
                id, record.id
            )));
        }

        Ok(record.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_core::conversation::EntryRole;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_directory_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path().join("conversations"));
        assert!(repo.list_summaries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_list_and_fetch() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path().join("conversations"));

        let mut record = ConversationRecord::new("Brainstorm");
        record.push(ConversationEntry::new(EntryRole::User, "e1"));
        record.push(ConversationEntry::new(EntryRole::Assistant, "e2"));
        repo.save(&record).await.unwrap();

        let summaries = repo.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, record.id);
        assert_eq!(summaries[0].title, "Brainstorm");
        assert_eq!(summaries[0].entry_count, 2);

        let entries = repo.fetch_entries(&record.id).await.unwrap();
        assert_eq!(entries.conversation_id, record.id);
        let contents: Vec<_> = entries.entries.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["e1", "e2"]);
    }

    #[tokio::test]
    async fn test_fetch_unknown_id_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());
        let err = repo
            .fetch_entries(&ConversationId::new("missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());
        for bad in ["../escape", "a/b", ".hidden", ""] {
            assert!(repo.fetch_entries(&ConversationId::new(bad)).await.is_err(), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_unreadable_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("conversations");
        let repo = DirConversationRepository::new(&dir);

        repo.save(&ConversationRecord::new("good")).await.unwrap();
        std::fs::write(dir.join("broken.toml"), "id = ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let summaries = repo.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "good");
    }

    #[tokio::test]
    async fn test_save_replaces_previous_version() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirConversationRepository::new(temp_dir.path());

        let mut record = ConversationRecord::new("draft");
        repo.save(&record).await.unwrap();
        record.push(ConversationEntry::new(EntryRole::User, "later"));
        repo.save(&record).await.unwrap();

        let entries = repo.fetch_entries(&record.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(repo.list_summaries().await.unwrap().len(), 1);
    }
}
