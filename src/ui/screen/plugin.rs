// src/ui/screen/plugin.rs
//
// UiPlugin coordinates screen rebuilding and input forwarding.

use bevy::prelude::*;

use crate::progression::{controller::ProgressionController, ProgressionSet};

use super::components::ScreenTracker;
use super::systems::{
    forward_advance_input, handle_choice_buttons, handle_quit_to_menu_hotkey, refresh_screen,
    style_choice_buttons,
};

/// Plugin providing the menu and dialogue screens.
///
/// # System Ordering
///
/// 1. Input systems write `ProgressionCommand` messages (before `ProgressionSet`)
/// 2. `ProgressionSet` applies them to the controller
/// 3. `refresh_screen` rebuilds the screen when the controller changed
///
/// # Dependencies
///
/// - `DialoguePlugin` (provides `DialogueStore`)
/// - `ProgressionPlugin` (provides the controller and command messages)
/// - `CorePlugin` (provides `ShellConfig` and the UI camera)
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScreenTracker>().add_systems(
            Update,
            (
                (
                    handle_choice_buttons,
                    forward_advance_input,
                    handle_quit_to_menu_hotkey,
                )
                    .before(ProgressionSet),
                style_choice_buttons,
                refresh_screen
                    .after(ProgressionSet)
                    .run_if(resource_changed::<ProgressionController>),
            ),
        );

        info!("UiPlugin registered");
    }
}
