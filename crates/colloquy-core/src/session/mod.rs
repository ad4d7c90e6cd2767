//! Conversation session module.
//!
//! # Module Structure
//!
//! - `loader`: token-guarded entry loader (`EntryLoader`, `LoadState`)
//! - `active`: shared active conversation state with a single writer
//! - `synchronizer`: commits loaded entries into the active state
//! - `visibility`: surface visibility derivation

mod active;
mod loader;
mod synchronizer;
mod visibility;

pub use active::{
    ActiveConversationReader, ActiveConversationWriter, ActiveDialog, active_conversation,
};
pub use loader::{EntryLoader, LoadOutcome, LoadState, LoadTicket, RequestToken, Settlement};
pub use synchronizer::{SessionSynchronizer, SyncOutcome};
pub use visibility::SurfaceVisibility;
