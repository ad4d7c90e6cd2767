//! Help overlay dismissal preference.
//!
//! The how-to guide and the conversation browser guide share a single
//! visibility flag. It is persisted under the `docs` key as `"true"` (help
//! visible) or `"false"` (dismissed).

use super::repository::PreferenceStore;
use std::sync::Arc;

/// Preference key holding the help visibility flag.
pub const HELP_DOCS_KEY: &str = "docs";

/// Reads and writes the "help docs dismissed" flag.
///
/// Failures never reach the caller: a failed read counts as "not dismissed",
/// a failed write is logged and dropped.
#[derive(Clone)]
pub struct HelpPreference {
    store: Arc<dyn PreferenceStore>,
}

impl HelpPreference {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Returns true only when a dismissal was explicitly stored.
    pub async fn read_help_dismissed(&self) -> bool {
        match self.store.get(HELP_DOCS_KEY).await {
            Ok(Some(value)) => value.trim() == "false",
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("[Preferences] Failed to read '{}': {}", HELP_DOCS_KEY, e);
                false
            }
        }
    }

    /// Persists the flag, best effort.
    pub async fn write_help_dismissed(&self, dismissed: bool) {
        let value = if dismissed { "false" } else { "true" };
        if let Err(e) = self.store.set(HELP_DOCS_KEY, value).await {
            tracing::warn!(
                "[Preferences] Failed to persist '{}' = {}: {}",
                HELP_DOCS_KEY,
                value,
                e
            );
        }
    }
}

/// Owner of the in-session help visibility flag.
///
/// Loaded once at mount; every change is applied in memory first and then
/// written through, so a dismissal holds for the session even if the write
/// fails.
pub struct HelpDocsState {
    preference: HelpPreference,
    visible: bool,
}

impl HelpDocsState {
    /// Reads the stored preference once.
    pub async fn load(preference: HelpPreference) -> Self {
        let visible = !preference.read_help_dismissed().await;
        tracing::debug!("[Preferences] Help docs visible at mount: {}", visible);
        Self {
            preference,
            visible,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Hides both help overlays and persists the dismissal.
    pub async fn dismiss(&mut self) {
        self.set_visible(false).await;
    }

    pub async fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.preference.write_help_dismissed(!visible).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ColloquyError, Result};
    use crate::preference::InMemoryPreferenceStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl PreferenceStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(ColloquyError::io("disk unavailable"))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ColloquyError::io("disk unavailable"))
        }
    }

    #[tokio::test]
    async fn test_absent_value_means_visible() {
        let preference = HelpPreference::new(Arc::new(InMemoryPreferenceStore::new()));
        assert!(!preference.read_help_dismissed().await);
    }

    #[tokio::test]
    async fn test_only_false_means_dismissed() {
        for (stored, dismissed) in [("false", true), ("true", false), ("garbage", false)] {
            let store = InMemoryPreferenceStore::with_entry(HELP_DOCS_KEY, stored);
            let preference = HelpPreference::new(Arc::new(store));
            assert_eq!(preference.read_help_dismissed().await, dismissed, "stored {stored}");
        }
    }

    #[tokio::test]
    async fn test_write_uses_docs_layout() {
        let store = Arc::new(InMemoryPreferenceStore::new());
        let preference = HelpPreference::new(store.clone());

        preference.write_help_dismissed(true).await;
        assert_eq!(store.get(HELP_DOCS_KEY).await.unwrap().as_deref(), Some("false"));

        preference.write_help_dismissed(false).await;
        assert_eq!(store.get(HELP_DOCS_KEY).await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_read_failure_defaults_to_visible() {
        let state = HelpDocsState::load(HelpPreference::new(Arc::new(BrokenStore))).await;
        assert!(state.visible());
    }

    #[tokio::test]
    async fn test_dismiss_survives_write_failure() {
        let mut state = HelpDocsState::load(HelpPreference::new(Arc::new(BrokenStore))).await;
        state.dismiss().await;
        assert!(!state.visible());
    }

    #[tokio::test]
    async fn test_dismissal_round_trip_across_mounts() {
        let store: Arc<dyn PreferenceStore> = Arc::new(InMemoryPreferenceStore::new());

        let mut first = HelpDocsState::load(HelpPreference::new(store.clone())).await;
        assert!(first.visible());
        first.dismiss().await;

        let second = HelpDocsState::load(HelpPreference::new(store)).await;
        assert!(!second.visible());
    }
}
