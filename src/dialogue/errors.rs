//! Error types surfaced by the dialogue store and progression controller.
use std::fmt;

/// Contract violations raised by scene lookup and progression.
///
/// None of these occur with the shipped catalog; each one points at a caller
/// bug and is returned immediately rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueError {
    /// No scene is registered under the requested name.
    NotFound { name: String },
    /// Line index outside `[0, line_count)`.
    IndexOutOfRange {
        scene: String,
        index: usize,
        line_count: usize,
    },
    /// A scene without lines was handed to the controller.
    InvalidScene { scene: String },
}

impl DialogueError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn index_out_of_range(scene: impl Into<String>, index: usize, line_count: usize) -> Self {
        Self::IndexOutOfRange {
            scene: scene.into(),
            index,
            line_count,
        }
    }

    pub fn invalid_scene(scene: impl Into<String>) -> Self {
        Self::InvalidScene {
            scene: scene.into(),
        }
    }

    /// Short machine-friendly label used in telemetry.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::IndexOutOfRange { .. } => "index_out_of_range",
            Self::InvalidScene { .. } => "invalid_scene",
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "no scene registered under \"{}\"", name),
            Self::IndexOutOfRange {
                scene,
                index,
                line_count,
            } => write!(
                f,
                "line {} is out of range for scene \"{}\" ({} lines)",
                index, scene, line_count
            ),
            Self::InvalidScene { scene } => {
                write!(f, "scene \"{}\" has no lines and cannot be started", scene)
            }
        }
    }
}

impl std::error::Error for DialogueError {}
