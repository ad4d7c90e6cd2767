//! TOML-backed configuration provider.
//!
//! Reads `config.toml` once via [`ConfigService::load`]. Until that completes
//! the snapshot reports `is_loading = true`. A missing or unreadable file
//! yields defaults rather than an error.

use crate::paths::ColloquyPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use colloquy_core::config::{ConfigurationProvider, ConfigurationSnapshot, ModelId};
use colloquy_core::error::{ColloquyError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Environment variable overriding the configured default model.
pub const DEFAULT_MODEL_ENV: &str = "COLLOQUY_DEFAULT_MODEL";

/// On-disk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub light_mode_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default)]
    pub conversation_browser_visible: bool,
}

impl AppConfig {
    fn to_snapshot(&self, model_override: Option<&str>) -> ConfigurationSnapshot {
        let model = model_override
            .or(self.default_model.as_deref())
            .unwrap_or_default();
        ConfigurationSnapshot {
            is_loading: false,
            light_mode_enabled: self.light_mode_enabled,
            default_language_model: ModelId::new(model),
            is_conversation_browser_visible: self.conversation_browser_visible,
        }
    }
}

/// Configuration provider persisted to `config.toml`.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicTomlFile<AppConfig>>,
    snapshot: Arc<RwLock<ConfigurationSnapshot>>,
    model_override: Option<String>,
}

impl ConfigService {
    /// Creates a service for the given file, without environment overrides.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            snapshot: Arc::new(RwLock::new(ConfigurationSnapshot::loading())),
            model_override: None,
        }
    }

    /// Creates a service at the location resolved by `paths`, honoring
    /// `COLLOQUY_DEFAULT_MODEL`.
    pub fn new(paths: &ColloquyPaths) -> Result<Self> {
        let model_override = std::env::var(DEFAULT_MODEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Ok(Self::with_path(paths.config_file()?).with_model_override(model_override))
    }

    /// Forces the default model regardless of the file contents.
    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        self.model_override = model;
        self
    }

    /// Reads the configuration file and publishes the resulting snapshot.
    pub async fn load(&self) -> ConfigurationSnapshot {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| ColloquyError::internal(format!("Failed to join task: {}", e)))
            .and_then(|result| result.map_err(ColloquyError::from));

        let config = match loaded {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::info!(
                    "[Config] No configuration at {:?}, using defaults",
                    self.file.path()
                );
                AppConfig::default()
            }
            Err(e) => {
                tracing::warn!("[Config] Failed to load configuration, using defaults: {}", e);
                AppConfig::default()
            }
        };

        let snapshot = config.to_snapshot(self.model_override.as_deref());
        *self.snapshot.write().await = snapshot.clone();
        snapshot
    }
}

#[async_trait]
impl ConfigurationProvider for ConfigService {
    async fn snapshot(&self) -> ConfigurationSnapshot {
        self.snapshot.read().await.clone()
    }

    async fn set_conversation_browser_visible(&self, visible: bool) -> Result<()> {
        self.snapshot.write().await.is_conversation_browser_visible = visible;

        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            file.update(AppConfig::default(), |config| {
                config.conversation_browser_visible = visible;
                Ok(())
            })
        })
        .await
        .map_err(|e| ColloquyError::internal(format!("Failed to join task: {}", e)))?
        .map_err(|e| {
            tracing::warn!("[Config] Failed to persist conversation browser flag: {}", e);
            ColloquyError::from(e)
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_is_loading_before_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert!(service.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        let snapshot = service.load().await;
        assert!(!snapshot.is_loading);
        assert!(!snapshot.light_mode_enabled);
        assert!(snapshot.default_language_model.is_unset());
        assert_eq!(service.snapshot().await, snapshot);
    }

    #[tokio::test]
    async fn test_reads_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "light_mode_enabled = true\ndefault_model = \"gpt-4o\"\nconversation_browser_visible = true\n",
        )
        .unwrap();

        let snapshot = ConfigService::with_path(path).load().await;
        assert!(snapshot.light_mode_enabled);
        assert_eq!(snapshot.default_language_model.as_str(), "gpt-4o");
        assert!(snapshot.is_conversation_browser_visible);
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "light_mode_enabled = [").unwrap();

        let snapshot = ConfigService::with_path(path).load().await;
        assert!(!snapshot.is_loading);
        assert!(!snapshot.light_mode_enabled);
    }

    #[tokio::test]
    async fn test_model_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "default_model = \"from-file\"\n").unwrap();

        let snapshot = ConfigService::with_path(path)
            .with_model_override(Some("from-env".to_string()))
            .load()
            .await;
        assert_eq!(snapshot.default_language_model.as_str(), "from-env");
    }

    #[tokio::test]
    async fn test_browser_flag_is_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "light_mode_enabled = true\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        service.load().await;
        service.set_conversation_browser_visible(true).await.unwrap();
        assert!(service.snapshot().await.is_conversation_browser_visible);

        let reloaded = ConfigService::with_path(path).load().await;
        assert!(reloaded.is_conversation_browser_visible);
        assert!(reloaded.light_mode_enabled);
    }
}
