//! Compiled-in scene catalog shipped with the shell.
use super::types::{DialogueLine, Scene};

pub const INTRODUCTION: &str = "Introduction";
pub const DEMO: &str = "Demo";

const INTRODUCTION_LINES: [&str; 7] = [
    "Welcome to InkPulse!",
    "This is a simple Visual Novel engine built with Rust and Bevy.",
    "At this stage, a menu panel is displayed first, and dialogue lines appear in the text window after starting.",
    "You can click on the window to move to the next line of dialogue.",
    "At the end of the dialogues, choice buttons appear.",
    "The code is clean and easy to extend with new features.",
    "Click a choice button to return to the menu or continue.",
];

const DEMO_LINES: [&str; 1] = ["Demo in production. Be patient!"];

/// Scenes in the order the main menu lists them.
pub fn builtin_scenes() -> Vec<Scene> {
    vec![
        Scene::new(DEMO, to_lines(&DEMO_LINES)).with_menu_label("Start Demo"),
        Scene::new(INTRODUCTION, to_lines(&INTRODUCTION_LINES)),
    ]
}

fn to_lines(texts: &[&str]) -> Vec<DialogueLine> {
    texts.iter().copied().map(DialogueLine::from).collect()
}
