//! Scene and line types held by the dialogue store.
use std::fmt;

use super::errors::DialogueError;

/// A single line of dialogue. Kept as a record so speaker or styling data can
/// be attached without touching callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    text: String,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for DialogueLine {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Named, ordered and immutable sequence of dialogue lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    name: String,
    menu_label: String,
    lines: Vec<DialogueLine>,
}

impl Scene {
    /// Creates a scene whose menu entry reuses its name.
    pub fn new(name: impl Into<String>, lines: Vec<DialogueLine>) -> Self {
        let name = name.into();
        Self {
            menu_label: name.clone(),
            name,
            lines,
        }
    }

    pub fn with_menu_label(mut self, label: impl Into<String>) -> Self {
        self.menu_label = label.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown on the menu button that starts this scene.
    pub fn menu_label(&self) -> &str {
        &self.menu_label
    }

    #[allow(dead_code)]
    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of the line at `index`.
    pub fn line_at(&self, index: usize) -> Result<&str, DialogueError> {
        self.lines
            .get(index)
            .map(DialogueLine::text)
            .ok_or_else(|| DialogueError::index_out_of_range(&self.name, index, self.lines.len()))
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} lines)", self.name, self.lines.len())
    }
}
