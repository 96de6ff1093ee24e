//! Progression module: the menu/scene state machine and the message plumbing
//! the presentation layer drives it through.
pub mod controller;
pub mod events;
pub mod plugin;
pub mod systems;
pub mod telemetry;

pub use plugin::{ProgressionPlugin, ProgressionSet};
