//! Application layer of the Colloquy session controller.
//!
//! Wires the core session logic to its collaborators and exposes the
//! landing page controller.
//!
//! # Module Structure
//!
//! - `home_controller`: `HomeController` and its collaborators
//! - `home_view`: the render-time view the controller derives
//! - `telemetry`: tracing subscriber setup

pub mod home_controller;
pub mod home_view;
pub mod telemetry;

pub use home_controller::{HomeCollaborators, HomeController};
pub use home_view::HomeView;
pub use telemetry::{TelemetryGuard, init_tracing};
