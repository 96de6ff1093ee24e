//! System applying presentation commands to the progression controller.
use bevy::prelude::*;

use crate::dialogue::{errors::DialogueError, store::DialogueStore};

use super::{
    controller::{ProgressionController, Transition},
    events::{ProgressionChanged, ProgressionCommand, ProgressionCommandFailed},
};

/// Drains queued commands in order. The controller is only flagged as changed
/// when a command actually moved the session, so ignored advances do not
/// trigger a redraw.
pub fn apply_progression_commands(
    mut requests: MessageReader<ProgressionCommand>,
    store: Res<DialogueStore>,
    mut controller: ResMut<ProgressionController>,
    mut changed: MessageWriter<ProgressionChanged>,
    mut failed: MessageWriter<ProgressionCommandFailed>,
) {
    for command in requests.read() {
        let outcome = apply_command(controller.bypass_change_detection(), &store, command);

        match outcome {
            Ok(Some(transition)) => {
                info!("Session {}", transition);
                if let Some(line) = controller.current_line() {
                    debug!("Current line: {}", line);
                }
                controller.set_changed();
                changed.write(ProgressionChanged {
                    transition,
                    snapshot: controller.to_snapshot(),
                });
            }
            Ok(None) => {
                debug!("Ignored {:?} in {} mode", command, controller.mode().label());
            }
            Err(error) => {
                error!("Rejected {:?}: {}", command, error);
                failed.write(ProgressionCommandFailed {
                    command: command.clone(),
                    error,
                });
            }
        }
    }
}

fn apply_command(
    controller: &mut ProgressionController,
    store: &DialogueStore,
    command: &ProgressionCommand,
) -> Result<Option<Transition>, DialogueError> {
    match command {
        ProgressionCommand::StartScene { name } => {
            let scene = store.get_scene(name)?;
            controller.start_scene(scene).map(Some)
        }
        ProgressionCommand::Advance => Ok(controller.advance()),
        ProgressionCommand::Restart => Ok(controller.restart()),
        ProgressionCommand::ReturnToMenu => Ok(Some(controller.return_to_menu())),
    }
}

/// Logs the full session snapshot after every change.
#[cfg(feature = "core_debug")]
pub fn log_session_snapshots(mut changes: MessageReader<ProgressionChanged>) {
    for change in changes.read() {
        match serde_json::to_string(&change.snapshot) {
            Ok(json) => info!(target: "core_debug", "Session snapshot: {}", json),
            Err(err) => warn!(target: "core_debug", "Failed to serialise snapshot: {}", err),
        }
    }
}
