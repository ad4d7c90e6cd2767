//! Render-time view handed to the presentational layer.

use colloquy_core::config::ModelId;
use colloquy_core::conversation::ConversationSummary;
use colloquy_core::session::{LoadState, SurfaceVisibility};

/// Everything the landing page needs to decide what to draw.
///
/// Built from one configuration snapshot and the controller's state at a
/// single point, so the flags are always mutually consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub is_config_loading: bool,
    pub light_mode_enabled: bool,
    pub default_language_model: ModelId,
    pub is_conversation_browser_visible: bool,
    pub is_settings_open: bool,
    pub selected_conversation: Option<ConversationSummary>,
    pub help_docs_visible: bool,
    pub surfaces: SurfaceVisibility,
    pub load_state: LoadState,
}

impl HomeView {
    /// True while the selected conversation's entries are being fetched.
    ///
    /// The workspace should render a neutral placeholder rather than whatever
    /// the active conversation state still holds.
    pub fn is_conversation_loading(&self) -> bool {
        self.load_state.is_loading()
    }
}
