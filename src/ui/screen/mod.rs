// src/ui/screen/mod.rs
//
// Screen module rebuilding the menu or dialogue box from controller state.

pub mod components;
pub mod plugin;
pub mod systems;

// Re-export main types
pub use plugin::UiPlugin;
