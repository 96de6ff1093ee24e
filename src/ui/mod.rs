// src/ui/mod.rs
//
// UI module providing the presentation layer for the shell.
//
// Current features:
// - Main menu listing every registered scene plus Exit
// - Dialogue box showing the current line, with end-of-scene choices
// - Click/keyboard input forwarded to the progression controller
//
// The UI never mutates session state directly; it sends ProgressionCommand
// messages and redraws whenever the controller changes.

pub mod screen;

// Re-export the main plugin
pub use screen::UiPlugin;
