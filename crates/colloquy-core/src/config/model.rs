//! Application configuration snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a language model (e.g. `gpt-4o`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no model has been configured.
    pub fn is_unset(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view of app-wide settings at one point in time.
///
/// While `is_loading` is true the other fields hold defaults and should not be
/// treated as the user's settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
    pub is_loading: bool,
    pub light_mode_enabled: bool,
    pub default_language_model: ModelId,
    pub is_conversation_browser_visible: bool,
}

impl ConfigurationSnapshot {
    /// Snapshot reported before the backing store has been read.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_snapshot() {
        let snapshot = ConfigurationSnapshot::loading();
        assert!(snapshot.is_loading);
        assert!(!snapshot.light_mode_enabled);
        assert!(snapshot.default_language_model.is_unset());
    }

    #[test]
    fn test_default_snapshot_is_settled() {
        let snapshot = ConfigurationSnapshot::default();
        assert!(!snapshot.is_loading);
        assert!(!snapshot.light_mode_enabled);
        assert!(!snapshot.is_conversation_browser_visible);
        assert!(snapshot.default_language_model.is_unset());
    }

    #[test]
    fn test_model_id_unset() {
        assert!(ModelId::new("  ").is_unset());
        assert!(!ModelId::new("gpt-4o").is_unset());
    }
}
