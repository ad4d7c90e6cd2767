//! Unified path management for Colloquy files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/colloquy/          # Config directory (platform default)
//! ├── config.toml              # Application configuration
//! ├── preferences.toml         # Client-side preferences (help docs flag)
//! ├── conversations/           # One TOML file per conversation
//! └── logs/                    # Application logs
//!     └── colloquy.log.YYYY-MM-DD
//! ```
//!
//! Every path can be rooted elsewhere by constructing [`ColloquyPaths`] with an
//! explicit base directory, which is what the tests do.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for colloquy_core::ColloquyError {
    fn from(err: PathError) -> Self {
        colloquy_core::ColloquyError::config(err.to_string())
    }
}

/// Path resolver for Colloquy storage.
#[derive(Debug, Clone, Default)]
pub struct ColloquyPaths {
    base_dir: Option<PathBuf>,
}

impl ColloquyPaths {
    /// Application directory name under the platform config directory.
    pub const APP_DIR: &'static str = "colloquy";

    /// Creates a resolver.
    ///
    /// With `None`, paths resolve under `dirs::config_dir()/colloquy`.
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the colloquy configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(Self::APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the preferences file.
    pub fn preferences_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("preferences.toml"))
    }

    /// Returns the directory holding one file per conversation.
    pub fn conversations_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("conversations"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
