//! Dialogue module hosting the scene catalog, lookup store, and error types.
pub mod catalog;
pub mod errors;
pub mod plugin;
pub mod store;
pub mod types;

pub use plugin::DialoguePlugin;
