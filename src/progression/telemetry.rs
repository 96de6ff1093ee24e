//! Telemetry storage for session transitions and rejected commands.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::Serialize;

use crate::dialogue::errors::DialogueError;

use super::{
    controller::{SessionSnapshot, Transition},
    events::{ProgressionChanged, ProgressionCommand, ProgressionCommandFailed},
};

const DEFAULT_SESSION_TELEMETRY_LOG_PATH: &str = "logs/session_history.jsonl";

const DEFAULT_SESSION_TELEMETRY_CAPACITY: usize = 64;

/// Rolling history of session events.
#[derive(Resource, Debug)]
pub struct SessionTelemetry {
    capacity: usize,
    records: VecDeque<SessionTelemetryRecord>,
}

impl SessionTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: SessionTelemetryRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[allow(dead_code)]
    pub fn records(&self) -> impl Iterator<Item = &SessionTelemetryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SessionTelemetry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TELEMETRY_CAPACITY)
    }
}

/// Single telemetry entry.
#[derive(Debug, Clone)]
pub struct SessionTelemetryRecord {
    pub occurred_at_seconds: f64,
    pub event: SessionTelemetryEvent,
}

/// Either an applied transition or a rejected command.
#[derive(Debug, Clone)]
pub enum SessionTelemetryEvent {
    Transition {
        transition: Transition,
        snapshot: SessionSnapshot,
    },
    Rejected {
        command: ProgressionCommand,
        error: DialogueError,
    },
}

/// System that records session telemetry from progression messages.
pub fn record_session_telemetry(
    time: Res<Time>,
    mut telemetry: ResMut<SessionTelemetry>,
    mut changes: MessageReader<ProgressionChanged>,
    mut failures: MessageReader<ProgressionCommandFailed>,
    mut log: ResMut<SessionTelemetryLog>,
) {
    let now = time.elapsed_secs_f64();

    for change in changes.read() {
        let record = SessionTelemetryRecord {
            occurred_at_seconds: now,
            event: SessionTelemetryEvent::Transition {
                transition: change.transition.clone(),
                snapshot: change.snapshot.clone(),
            },
        };
        log.push(&record);
        telemetry.push(record);
    }

    for failure in failures.read() {
        let record = SessionTelemetryRecord {
            occurred_at_seconds: now,
            event: SessionTelemetryEvent::Rejected {
                command: failure.command.clone(),
                error: failure.error.clone(),
            },
        };
        log.push(&record);
        telemetry.push(record);
    }
}

/// Buffered log that appends session telemetry to disk as JSON lines.
#[derive(Resource, Debug)]
pub struct SessionTelemetryLog {
    output_path: PathBuf,
    pending: Vec<SessionTelemetryRecord>,
}

impl SessionTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &SessionTelemetryRecord) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            let serialisable: SerializableSessionRecord = record.into();
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for SessionTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TELEMETRY_LOG_PATH)
    }
}

/// Flushes pending telemetry log entries, logging a warning if persistence fails.
pub fn flush_session_telemetry_log(
    telemetry: Res<SessionTelemetry>,
    mut log: ResMut<SessionTelemetryLog>,
) {
    if log.is_empty() {
        return;
    }
    let flushed = log.pending_len();
    match log.flush() {
        Ok(()) => debug!(
            "Flushed {} session records to {:?} ({} kept in history)",
            flushed,
            log.path(),
            telemetry.len()
        ),
        Err(err) => warn!(
            "Failed to persist session telemetry to {:?}: {}",
            log.path(),
            err
        ),
    }
}

#[derive(Serialize)]
struct SerializableSessionRecord {
    occurred_at_seconds: f64,
    event: SerializableSessionEvent,
}

impl From<SessionTelemetryRecord> for SerializableSessionRecord {
    fn from(value: SessionTelemetryRecord) -> Self {
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            event: value.event.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableSessionEvent {
    Transition {
        transition: SerializableTransition,
        session: SessionSnapshot,
    },
    Rejected {
        command: String,
        error_kind: &'static str,
        message: String,
    },
}

impl From<SessionTelemetryEvent> for SerializableSessionEvent {
    fn from(value: SessionTelemetryEvent) -> Self {
        match value {
            SessionTelemetryEvent::Transition {
                transition,
                snapshot,
            } => Self::Transition {
                transition: transition.into(),
                session: snapshot,
            },
            SessionTelemetryEvent::Rejected { command, error } => Self::Rejected {
                command: format!("{:?}", command),
                error_kind: error.label(),
                message: error.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SerializableTransition {
    SceneStarted { scene: String, line_count: usize },
    Advanced { scene: String, index: usize },
    SceneEnded { scene: String, index: usize },
    Restarted { scene: String },
    ReturnedToMenu { from_scene: Option<String> },
}

impl From<Transition> for SerializableTransition {
    fn from(value: Transition) -> Self {
        match value {
            Transition::SceneStarted { scene, line_count } => {
                Self::SceneStarted { scene, line_count }
            }
            Transition::Advanced { scene, index } => Self::Advanced { scene, index },
            Transition::SceneEnded { scene, index } => Self::SceneEnded { scene, index },
            Transition::Restarted { scene } => Self::Restarted { scene },
            Transition::ReturnedToMenu { from_scene } => Self::ReturnedToMenu { from_scene },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::controller::SessionMode;
    use serde_json::Value;
    use std::{env, fs, time::SystemTime};

    fn menu_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            mode: SessionMode::InMenu,
            scene: None,
            current_index: 0,
            scene_ended: false,
        }
    }

    fn transition_record(at: f64) -> SessionTelemetryRecord {
        SessionTelemetryRecord {
            occurred_at_seconds: at,
            event: SessionTelemetryEvent::Transition {
                transition: Transition::ReturnedToMenu { from_scene: None },
                snapshot: menu_snapshot(),
            },
        }
    }

    fn unique_log_path(stem: &str) -> PathBuf {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        env::temp_dir().join(format!("{}_{}.jsonl", stem, unique_suffix))
    }

    #[test]
    fn telemetry_drops_old_records_when_full() {
        let mut telemetry = SessionTelemetry::new(2);
        telemetry.push(transition_record(1.0));
        telemetry.push(SessionTelemetryRecord {
            occurred_at_seconds: 2.0,
            event: SessionTelemetryEvent::Rejected {
                command: ProgressionCommand::start_scene("Epilogue"),
                error: DialogueError::not_found("Epilogue"),
            },
        });
        telemetry.push(transition_record(3.0));

        assert_eq!(telemetry.len(), 2);
        assert!(telemetry
            .records()
            .all(|record| record.occurred_at_seconds >= 2.0));
    }

    #[test]
    fn telemetry_log_writes_json_lines() {
        let path = unique_log_path("session_log_test");
        let mut log = SessionTelemetryLog::new(&path);

        log.push(&SessionTelemetryRecord {
            occurred_at_seconds: 4.5,
            event: SessionTelemetryEvent::Transition {
                transition: Transition::SceneEnded {
                    scene: "Demo".to_string(),
                    index: 0,
                },
                snapshot: SessionSnapshot {
                    mode: SessionMode::InScene,
                    scene: Some("Demo".to_string()),
                    current_index: 0,
                    scene_ended: true,
                },
            },
        });
        log.push(&SessionTelemetryRecord {
            occurred_at_seconds: 5.0,
            event: SessionTelemetryEvent::Rejected {
                command: ProgressionCommand::start_scene("Blank"),
                error: DialogueError::invalid_scene("Blank"),
            },
        });
        log.flush().expect("telemetry log should flush");
        assert!(log.is_empty());

        let raw = fs::read_to_string(&path).expect("log file should exist");
        let lines: Vec<_> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let ended: Value = serde_json::from_str(lines[0]).expect("json line should parse");
        assert_eq!(ended["event"]["event_type"], "transition");
        assert_eq!(ended["event"]["transition"]["kind"], "scene_ended");
        assert_eq!(ended["event"]["session"]["mode"], "in_scene");
        assert_eq!(ended["event"]["session"]["scene_ended"], true);

        let rejected: Value = serde_json::from_str(lines[1]).expect("json line should parse");
        assert_eq!(rejected["event"]["event_type"], "rejected");
        assert_eq!(rejected["event"]["error_kind"], "invalid_scene");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn flush_without_records_does_not_touch_disk() {
        let path = unique_log_path("session_log_empty");
        let mut log = SessionTelemetryLog::new(&path);
        log.flush().expect("empty flush succeeds");
        assert!(!path.exists());
    }

    #[test]
    fn flush_system_drains_log_and_keeps_history() {
        let path = unique_log_path("session_log_system");
        let mut telemetry = SessionTelemetry::new(4);
        let mut log = SessionTelemetryLog::new(&path);
        for at in [1.0, 2.0] {
            let record = transition_record(at);
            log.push(&record);
            telemetry.push(record);
        }

        let mut app = App::new();
        app.insert_resource(telemetry)
            .insert_resource(log)
            .add_systems(Update, flush_session_telemetry_log);
        app.update();

        assert!(app.world().resource::<SessionTelemetryLog>().is_empty());
        assert_eq!(app.world().resource::<SessionTelemetry>().len(), 2);
        let raw = fs::read_to_string(&path).expect("log file should exist");
        assert_eq!(raw.lines().count(), 2);

        let _ = fs::remove_file(&path);
    }
}
