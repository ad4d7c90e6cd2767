//! App-wide configuration consumed by the controller.

mod model;
mod provider;

pub use model::{ConfigurationSnapshot, ModelId};
pub use provider::ConfigurationProvider;
