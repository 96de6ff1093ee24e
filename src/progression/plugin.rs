//! Progression plugin wiring the controller, its messages, and telemetry.
use bevy::prelude::*;

use crate::core::config::ShellConfig;

use super::{
    controller::ProgressionController,
    events::{ProgressionChanged, ProgressionCommand, ProgressionCommandFailed},
    systems::apply_progression_commands,
    telemetry::{
        flush_session_telemetry_log, record_session_telemetry, SessionTelemetry,
        SessionTelemetryLog,
    },
};

/// System set the presentation layer orders its input systems before.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressionSet;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        let telemetry = app
            .world()
            .get_resource::<ShellConfig>()
            .map(|config| config.telemetry.clone())
            .unwrap_or_else(|| ShellConfig::default().telemetry);

        app.init_resource::<ProgressionController>()
            .add_message::<ProgressionCommand>()
            .add_message::<ProgressionChanged>()
            .add_message::<ProgressionCommandFailed>()
            .add_systems(Update, apply_progression_commands.in_set(ProgressionSet));

        if telemetry.enabled {
            info!(
                "Session telemetry enabled ({} records, log {})",
                telemetry.capacity,
                telemetry.log_path.display()
            );
            app.insert_resource(SessionTelemetry::new(telemetry.capacity))
                .insert_resource(SessionTelemetryLog::new(telemetry.log_path))
                .add_systems(
                    Update,
                    (record_session_telemetry, flush_session_telemetry_log)
                        .chain()
                        .after(ProgressionSet),
                );
        }

        #[cfg(feature = "core_debug")]
        {
            app.add_systems(
                Update,
                super::systems::log_session_snapshots.after(ProgressionSet),
            );
        }
    }
}
