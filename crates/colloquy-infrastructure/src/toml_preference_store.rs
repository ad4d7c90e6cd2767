//! TOML-backed preference store.
//!
//! File layout:
//!
//! ```toml
//! [entries]
//! docs = "false"
//! ```

use crate::paths::ColloquyPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use colloquy_core::error::{ColloquyError, Result};
use colloquy_core::preference::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PreferencesFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Preference store persisted to `preferences.toml`.
///
/// The file is read on first access and cached; writes go through an atomic
/// locked update and then refresh the cache.
#[derive(Clone)]
pub struct TomlPreferenceStore {
    file: Arc<AtomicTomlFile<PreferencesFile>>,
    cache: Arc<Mutex<Option<PreferencesFile>>>,
}

impl TomlPreferenceStore {
    /// Creates a store for the given file path. Nothing is read yet.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a store at the location resolved by `paths`.
    pub fn new(paths: &ColloquyPaths) -> Result<Self> {
        Ok(Self::with_path(paths.preferences_file()?))
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&AtomicTomlFile<PreferencesFile>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| ColloquyError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl PreferenceStore for TomlPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            let loaded = self
                .run_blocking(|file| Ok(file.load()?.unwrap_or_default()))
                .await?;
            tracing::debug!(
                "[Preferences] Loaded {} entries from {:?}",
                loaded.entries.len(),
                self.file.path()
            );
            *cache = Some(loaded);
        }

        Ok(cache
            .as_ref()
            .and_then(|prefs| prefs.entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.lock().await;

        let (key_owned, value_owned) = (key.to_string(), value.to_string());
        let updated = self
            .run_blocking(move |file| {
                Ok(file.update(PreferencesFile::default(), |prefs| {
                    prefs.entries.insert(key_owned, value_owned);
                    Ok(())
                })?)
            })
            .await?;

        tracing::debug!("[Preferences] Stored '{}' = '{}'", key, value);
        *cache = Some(updated);
        Ok(())
    }
}
