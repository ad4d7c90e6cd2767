//! File-backed collaborators for the Colloquy session controller.

pub mod config_service;
pub mod dir_conversation_repository;
pub mod paths;
pub mod storage;
pub mod toml_preference_store;

pub use crate::config_service::{AppConfig, ConfigService};
pub use crate::dir_conversation_repository::{ConversationRecord, DirConversationRepository};
pub use crate::paths::ColloquyPaths;
pub use crate::toml_preference_store::TomlPreferenceStore;
