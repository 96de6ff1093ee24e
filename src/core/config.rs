//! Shell configuration loaded from `config/shell.toml`.
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/shell.toml";
const CONFIG_PATH_ENV: &str = "INKPULSE_CONFIG";

const MIN_FONT_SIZE: f32 = 6.0;
const MIN_TELEMETRY_CAPACITY: usize = 1;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawShellConfig {
    #[serde(default)]
    window: RawWindow,
    #[serde(default)]
    log: RawLog,
    #[serde(default)]
    menu: RawMenu,
    #[serde(default)]
    dialogue_box: RawDialogueBox,
    #[serde(default)]
    input: RawInput,
    #[serde(default)]
    telemetry: RawTelemetry,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawWindow {
    title: String,
    resizable: bool,
}

impl Default for RawWindow {
    fn default() -> Self {
        Self {
            title: "InkPulse".to_string(),
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawLog {
    filter: String,
}

impl Default for RawLog {
    fn default() -> Self {
        Self {
            filter: "info,wgpu=error,naga=warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawMenu {
    panel_width: f32,
    button_height: f32,
    margin: f32,
    font_size: f32,
}

impl Default for RawMenu {
    fn default() -> Self {
        Self {
            panel_width: 200.0,
            button_height: 60.0,
            margin: 10.0,
            font_size: 18.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDialogueBox {
    height: f32,
    padding: f32,
    border_width: f32,
    text_font_size: f32,
    choice_font_size: f32,
}

impl Default for RawDialogueBox {
    fn default() -> Self {
        Self {
            height: 180.0,
            padding: 16.0,
            border_width: 2.0,
            text_font_size: 22.0,
            choice_font_size: 18.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInput {
    advance_keys_enabled: bool,
    quit_to_menu_hotkey: bool,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            advance_keys_enabled: true,
            quit_to_menu_hotkey: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTelemetry {
    enabled: bool,
    log_path: String,
    capacity: usize,
}

impl Default for RawTelemetry {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: "logs/session_history.jsonl".to_string(),
            capacity: 64,
        }
    }
}

/// Runtime configuration for the presentation shell.
#[derive(Resource, Debug, Clone)]
pub struct ShellConfig {
    pub window: WindowSettings,
    pub log: LogSettings,
    pub menu: MenuSettings,
    pub dialogue_box: DialogueBoxSettings,
    pub input: InputSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub resizable: bool,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub filter: String,
}

#[derive(Debug, Clone)]
pub struct MenuSettings {
    pub panel_width: f32,
    pub button_height: f32,
    pub margin: f32,
    pub font_size: f32,
}

#[derive(Debug, Clone)]
pub struct DialogueBoxSettings {
    pub height: f32,
    pub padding: f32,
    pub border_width: f32,
    pub text_font_size: f32,
    pub choice_font_size: f32,
}

#[derive(Debug, Clone)]
pub struct InputSettings {
    /// Space and Enter advance dialogue alongside the left mouse button.
    pub advance_keys_enabled: bool,
    /// Escape returns to the menu from anywhere inside a scene.
    pub quit_to_menu_hotkey: bool,
}

#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub log_path: PathBuf,
    pub capacity: usize,
}

/// A loaded config plus the reason defaults were used, if they were.
#[derive(Debug, Clone)]
pub struct LoadedShellConfig {
    pub config: ShellConfig,
    pub fallback_reason: Option<String>,
}

impl ShellConfig {
    /// Path of the config file, honouring the `INKPULSE_CONFIG` override.
    pub fn config_path() -> PathBuf {
        env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_PATH))
    }

    /// Loads the config file, falling back to defaults when it is missing or
    /// malformed.
    ///
    /// Runs before the log subscriber exists, so the fallback reason is handed
    /// back for `CorePlugin` to report once logging is up.
    pub fn load() -> LoadedShellConfig {
        Self::load_from_path(&Self::config_path())
    }

    pub fn load_from_path(path: &Path) -> LoadedShellConfig {
        let result = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read {} ({})", path.display(), err))
            .and_then(|raw| {
                Self::from_toml_str(&raw)
                    .map_err(|err| format!("Failed to parse {} ({})", path.display(), err))
            });

        match result {
            Ok(config) => LoadedShellConfig {
                config,
                fallback_reason: None,
            },
            Err(reason) => LoadedShellConfig {
                config: Self::default(),
                fallback_reason: Some(reason),
            },
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawShellConfig>(raw).map(Self::from)
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        RawShellConfig::default().into()
    }
}

impl From<RawShellConfig> for ShellConfig {
    fn from(value: RawShellConfig) -> Self {
        let title = value.window.title.trim();
        let window = WindowSettings {
            title: if title.is_empty() {
                RawWindow::default().title
            } else {
                title.to_string()
            },
            resizable: value.window.resizable,
        };

        let filter = value.log.filter.trim();
        let log = LogSettings {
            filter: if filter.is_empty() {
                RawLog::default().filter
            } else {
                filter.to_string()
            },
        };

        let menu = MenuSettings {
            panel_width: value.menu.panel_width.max(1.0),
            button_height: value.menu.button_height.max(1.0),
            margin: value.menu.margin.max(0.0),
            font_size: value.menu.font_size.max(MIN_FONT_SIZE),
        };

        let dialogue_box = DialogueBoxSettings {
            height: value.dialogue_box.height.max(1.0),
            padding: value.dialogue_box.padding.max(0.0),
            border_width: value.dialogue_box.border_width.max(0.0),
            text_font_size: value.dialogue_box.text_font_size.max(MIN_FONT_SIZE),
            choice_font_size: value.dialogue_box.choice_font_size.max(MIN_FONT_SIZE),
        };

        let input = InputSettings {
            advance_keys_enabled: value.input.advance_keys_enabled,
            quit_to_menu_hotkey: value.input.quit_to_menu_hotkey,
        };

        let log_path = value.telemetry.log_path.trim();
        let telemetry = TelemetrySettings {
            enabled: value.telemetry.enabled,
            log_path: if log_path.is_empty() {
                PathBuf::from(RawTelemetry::default().log_path)
            } else {
                PathBuf::from(log_path)
            },
            capacity: value.telemetry.capacity.max(MIN_TELEMETRY_CAPACITY),
        };

        Self {
            window,
            log,
            menu,
            dialogue_box,
            input,
            telemetry,
        }
    }
}
