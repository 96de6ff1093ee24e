//! CorePlugin wires shell configuration, the UI camera, and startup logging.
use bevy::prelude::*;

use super::config::{LoadedShellConfig, ShellConfig};

/// Marker for the camera every UI node renders through.
#[derive(Component, Debug)]
pub struct ShellCamera;

/// Registers the shell configuration resource and bootstrap systems.
#[derive(Debug, Clone)]
pub struct CorePlugin {
    config: ShellConfig,
    fallback_reason: Option<String>,
}

impl CorePlugin {
    /// Creates a CorePlugin around an already loaded configuration.
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            fallback_reason: None,
        }
    }
}

impl From<LoadedShellConfig> for CorePlugin {
    fn from(loaded: LoadedShellConfig) -> Self {
        Self {
            config: loaded.config,
            fallback_reason: loaded.fallback_reason,
        }
    }
}

/// Why the shell is running on default settings, if it is.
#[derive(Resource, Debug, Default, Clone)]
pub struct ConfigFallback(pub Option<String>);

impl Default for CorePlugin {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(ConfigFallback(self.fallback_reason.clone()))
            .add_systems(
                Startup,
                (
                    spawn_shell_camera,
                    (report_config_fallback, log_startup_config).chain(),
                ),
            );
    }
}

fn spawn_shell_camera(mut commands: Commands) {
    commands.spawn((Camera2d, ShellCamera, Name::new("Shell Camera")));
}

fn report_config_fallback(fallback: Res<ConfigFallback>) {
    if let Some(reason) = &fallback.0 {
        warn!("{}. Falling back to defaults.", reason);
    }
}

fn log_startup_config(config: Res<ShellConfig>) {
    info!(
        "CorePlugin initialised: window \"{}\", advance keys {}, quit hotkey {}, telemetry {}",
        config.window.title,
        if config.input.advance_keys_enabled {
            "on"
        } else {
            "off"
        },
        if config.input.quit_to_menu_hotkey {
            "on"
        } else {
            "off"
        },
        if config.telemetry.enabled {
            config.telemetry.log_path.display().to_string()
        } else {
            "disabled".to_string()
        },
    );
}
