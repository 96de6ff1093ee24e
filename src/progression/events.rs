//! Messages exchanged between the presentation layer and the controller.
use bevy::prelude::Message;

use crate::dialogue::errors::DialogueError;

use super::controller::{SessionSnapshot, Transition};

/// Requests the presentation layer sends to the progression controller.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionCommand {
    StartScene { name: String },
    Advance,
    Restart,
    ReturnToMenu,
}

impl ProgressionCommand {
    pub fn start_scene(name: impl Into<String>) -> Self {
        Self::StartScene { name: name.into() }
    }
}

/// Fired after a command changed the session.
#[derive(Message, Debug, Clone)]
pub struct ProgressionChanged {
    pub transition: Transition,
    pub snapshot: SessionSnapshot,
}

/// Fired when a command was rejected; the session is left as it was.
#[derive(Message, Debug, Clone)]
pub struct ProgressionCommandFailed {
    pub command: ProgressionCommand,
    pub error: DialogueError,
}
