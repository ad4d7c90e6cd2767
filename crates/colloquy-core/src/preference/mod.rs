//! Persisted client-side preferences.

mod help;
mod repository;

pub use help::{HELP_DOCS_KEY, HelpDocsState, HelpPreference};
pub use repository::{InMemoryPreferenceStore, PreferenceStore};
