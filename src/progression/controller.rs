//! Menu/scene state machine walked by the presentation layer.
use std::{fmt, sync::Arc};

use bevy::prelude::Resource;
use serde::Serialize;

use crate::dialogue::{errors::DialogueError, types::Scene};

/// Top-level mode of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    InMenu,
    InScene,
}

impl SessionMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::InMenu => "in_menu",
            Self::InScene => "in_scene",
        }
    }
}

/// State change reported by a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SceneStarted { scene: String, line_count: usize },
    Advanced { scene: String, index: usize },
    SceneEnded { scene: String, index: usize },
    Restarted { scene: String },
    ReturnedToMenu { from_scene: Option<String> },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SceneStarted { scene, line_count } => {
                write!(f, "started \"{}\" ({} lines)", scene, line_count)
            }
            Self::Advanced { scene, index } => {
                write!(f, "\"{}\" advanced to line {}", scene, index)
            }
            Self::SceneEnded { scene, index } => {
                write!(f, "\"{}\" ended on line {}", scene, index)
            }
            Self::Restarted { scene } => write!(f, "restarted \"{}\"", scene),
            Self::ReturnedToMenu {
                from_scene: Some(scene),
            } => write!(f, "returned to menu from \"{}\"", scene),
            Self::ReturnedToMenu { from_scene: None } => write!(f, "returned to menu"),
        }
    }
}

/// Session state: mode, position inside the active scene, and the end flag.
///
/// Invariants while in a scene: `current_index < active_scene.line_count()`,
/// and `scene_ended` implies `current_index` is the last line. In the menu the
/// index is zero, the flag is clear, and there is no active scene.
#[derive(Resource, Debug, Default, Clone)]
pub struct ProgressionController {
    mode: SessionMode,
    current_index: usize,
    scene_ended: bool,
    active_scene: Option<Arc<Scene>>,
}

impl ProgressionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `scene` at its first line. Empty scenes are rejected and leave
    /// the session untouched.
    pub fn start_scene(&mut self, scene: Arc<Scene>) -> Result<Transition, DialogueError> {
        if scene.is_empty() {
            return Err(DialogueError::invalid_scene(scene.name()));
        }

        let transition = Transition::SceneStarted {
            scene: scene.name().to_string(),
            line_count: scene.line_count(),
        };
        self.mode = SessionMode::InScene;
        self.current_index = 0;
        self.scene_ended = false;
        self.active_scene = Some(scene);
        Ok(transition)
    }

    /// Moves to the next line, or flags the scene as ended when already on the
    /// last one. Returns `None` in the menu or once the scene has ended.
    pub fn advance(&mut self) -> Option<Transition> {
        if self.scene_ended {
            return None;
        }
        let scene = self.active_scene.as_ref()?;
        let name = scene.name().to_string();

        if self.current_index + 1 >= scene.line_count() {
            self.scene_ended = true;
            Some(Transition::SceneEnded {
                scene: name,
                index: self.current_index,
            })
        } else {
            self.current_index += 1;
            Some(Transition::Advanced {
                scene: name,
                index: self.current_index,
            })
        }
    }

    /// Rewinds the active scene to its first line. Returns `None` in the menu.
    pub fn restart(&mut self) -> Option<Transition> {
        let scene = self.active_scene.as_ref()?;
        let transition = Transition::Restarted {
            scene: scene.name().to_string(),
        };
        self.current_index = 0;
        self.scene_ended = false;
        Some(transition)
    }

    /// Leaves any state for the menu. Valid mid-scene as well as at the end.
    pub fn return_to_menu(&mut self) -> Transition {
        let from_scene = self
            .active_scene
            .take()
            .map(|scene| scene.name().to_string());
        self.mode = SessionMode::InMenu;
        self.current_index = 0;
        self.scene_ended = false;
        Transition::ReturnedToMenu { from_scene }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_ended(&self) -> bool {
        self.scene_ended
    }

    pub fn is_in_menu(&self) -> bool {
        self.mode == SessionMode::InMenu
    }

    pub fn active_scene(&self) -> Option<&Arc<Scene>> {
        self.active_scene.as_ref()
    }

    /// Text of the line to render, if a scene is active.
    pub fn current_line(&self) -> Option<&str> {
        self.active_scene
            .as_ref()
            .and_then(|scene| scene.line_at(self.current_index).ok())
    }

    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            scene: self
                .active_scene
                .as_ref()
                .map(|scene| scene.name().to_string()),
            current_index: self.current_index,
            scene_ended: self.scene_ended,
        }
    }
}

/// Serializable view of the session for telemetry and debug logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub scene: Option<String>,
    pub current_index: usize,
    pub scene_ended: bool,
}
