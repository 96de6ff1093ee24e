//! Core module hosting shell configuration and the camera/bootstrap plugin.
pub mod config;
pub mod plugin;

pub use config::ShellConfig;
pub use plugin::CorePlugin;
