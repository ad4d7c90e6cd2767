//! Configuration provider trait.

use super::model::ConfigurationSnapshot;
use crate::error::Result;
use async_trait::async_trait;

/// Source of the app-wide configuration snapshot.
///
/// The controller only reads the snapshot, except for the conversation
/// browser flag which it toggles through the dedicated setter.
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Returns the current snapshot, which may still be loading.
    async fn snapshot(&self) -> ConfigurationSnapshot;

    /// Shows or hides the conversation browser panel.
    async fn set_conversation_browser_visible(&self, visible: bool) -> Result<()>;
}
