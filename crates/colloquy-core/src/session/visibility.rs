//! Derivation of which top-level surfaces are shown.

use serde::Serialize;

/// Visibility of the four top-level surfaces.
///
/// Workspace and empty-state docs are mutually exclusive. The two help
/// overlays share one dismissal flag and render on top of either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceVisibility {
    pub show_workspace: bool,
    pub show_empty_docs: bool,
    pub show_how_to: bool,
    pub show_conversation_browser_docs: bool,
}

impl SurfaceVisibility {
    pub fn derive(conversation_selected: bool, help_dismissed: bool) -> Self {
        Self {
            show_workspace: conversation_selected,
            show_empty_docs: !conversation_selected,
            show_how_to: !help_dismissed,
            show_conversation_browser_docs: !help_dismissed,
        }
    }
}
