//! Domain layer for Colloquy.
//!
//! Holds the conversation session logic that decides what the landing page
//! shows: resolving the most recent conversation, loading its entries with a
//! stale-response guard, committing them into shared state, and deriving
//! surface visibility. Storage and UI live behind the traits defined here.

pub mod config;
pub mod conversation;
pub mod error;
pub mod preference;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::{ColloquyError, Result};
