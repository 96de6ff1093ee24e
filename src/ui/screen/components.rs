// src/ui/screen/components.rs
//
// Components and resources for the menu and dialogue screens.

use bevy::prelude::*;

use crate::progression::events::ProgressionCommand;

/// Marker for the root node of whichever screen is currently shown.
#[derive(Component, Debug)]
pub struct ScreenRoot;

/// Marker for the text node that shows the current dialogue line.
#[derive(Component, Debug)]
pub struct DialogueText;

/// What a choice button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceAction {
    /// Start the scene registered under this name.
    StartScene(String),
    /// Replay the current scene from its first line.
    Continue,
    BackToMenu,
    Exit,
}

impl ChoiceAction {
    /// Progression command for this action. `Exit` has none; it closes the app.
    pub fn command(&self) -> Option<ProgressionCommand> {
        match self {
            Self::StartScene(name) => Some(ProgressionCommand::start_scene(name.clone())),
            Self::Continue => Some(ProgressionCommand::Restart),
            Self::BackToMenu => Some(ProgressionCommand::ReturnToMenu),
            Self::Exit => None,
        }
    }
}

/// Component attached to every menu and end-of-scene button.
#[derive(Component, Debug, Clone)]
pub struct ChoiceButton {
    pub action: ChoiceAction,
}

impl ChoiceButton {
    pub fn new(action: ChoiceAction) -> Self {
        Self { action }
    }
}

/// Resource tracking the currently spawned screen root.
#[derive(Resource, Debug, Default)]
pub struct ScreenTracker {
    pub root: Option<Entity>,
}
