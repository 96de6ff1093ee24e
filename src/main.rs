use std::path::Path;

use bevy::{log::LogPlugin, prelude::*};

mod core;
mod dialogue;
mod progression;
mod ui;

use crate::{
    core::{CorePlugin, ShellConfig},
    dialogue::DialoguePlugin,
    progression::ProgressionPlugin,
    ui::UiPlugin,
};

fn main() {
    load_env_file();

    // The window title and log filter are needed before DefaultPlugins; any
    // fallback warning is logged by CorePlugin once the subscriber exists.
    let loaded = ShellConfig::load();
    let config = loaded.config.clone();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        resizable: config.window.resizable,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: config.log.filter.clone(),
                    ..default()
                }),
        )
        .add_plugins((
            CorePlugin::from(loaded),
            DialoguePlugin,
            ProgressionPlugin, // After CorePlugin to read telemetry settings
            UiPlugin,
        ))
        .run();
}

fn load_env_file() {
    const ENV_FILE: &str = "inkpulse.env";

    let path = Path::new(ENV_FILE);
    if !path.exists() {
        return;
    }

    if let Err(err) = dotenvy::from_filename(path) {
        eprintln!("Failed to load {}: {}", ENV_FILE, err);
    }
}
