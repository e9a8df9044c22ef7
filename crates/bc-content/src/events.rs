// events.rs - Lifecycle events and notification dispatch.
//
// Every status change request ends in exactly one event: either the
// collaborator accepted the new status, or the request was rejected
// before any write. Sinks (a JSONL log, future webhooks) subscribe to
// these events; a failing sink never fails the status change itself.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::error::ContentError;
use crate::status::{EntityKind, Lifecycle};
use crate::transition::TransitionVerdict;

/// Events emitted around status changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ContentEvent {
    /// The collaborator persisted a new status.
    StatusChanged {
        kind: EntityKind,
        id: EntityId,
        from_status: String,
        to_status: String,
        timestamp: DateTime<Utc>,
    },

    /// A status change was refused before anything was written.
    TransitionRejected {
        kind: EntityKind,
        id: EntityId,
        from_status: String,
        to_status: String,
        reasons: Vec<String>,
        timestamp: DateTime<Utc>,
    },
}

impl ContentEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            ContentEvent::StatusChanged { .. } => "status_changed",
            ContentEvent::TransitionRejected { .. } => "transition_rejected",
        }
    }

    pub fn status_changed<S: Lifecycle>(id: EntityId, from: S, to: S) -> Self {
        ContentEvent::StatusChanged {
            kind: S::KIND,
            id,
            from_status: from.to_string(),
            to_status: to.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn rejected<S: Lifecycle>(id: EntityId, verdict: &TransitionVerdict<S>) -> Self {
        ContentEvent::TransitionRejected {
            kind: verdict.kind,
            id,
            from_status: verdict.from.to_string(),
            to_status: verdict.to.to_string(),
            reasons: verdict.reasons.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives content events.
pub trait NotificationSink: Send + Sync {
    /// Handle an event. Errors are logged but don't stop the system.
    fn send(&self, event: &ContentEvent) -> Result<(), ContentError>;
}

/// Appends events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &ContentEvent) -> Result<(), ContentError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ContentError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ContentError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| ContentError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Dispatches events to multiple sinks.
///
/// Errors from individual sinks are logged (via tracing) but don't
/// prevent other sinks from receiving the event.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn dispatch(&self, event: &ContentEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!("notification sink error: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Trek;
    use crate::status::TrekStatus;
    use crate::transition::evaluate_transition;
    use tempfile::tempdir;

    #[test]
    fn log_sink_appends_one_line_per_event() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let sink = LogSink::new(&path);

        sink.send(&ContentEvent::status_changed(
            1,
            TrekStatus::Draft,
            TrekStatus::Archived,
        ))
        .unwrap();
        sink.send(&ContentEvent::status_changed(
            1,
            TrekStatus::Archived,
            TrekStatus::Draft,
        ))
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event_type\":\"status_changed\""));
        assert!(lines[0].contains("\"to_status\":\"archived\""));
    }

    #[test]
    fn rejected_event_carries_reasons() {
        let trek = Trek::new("", "");
        let verdict = evaluate_transition(&trek, TrekStatus::Published);
        let event = ContentEvent::rejected(trek.id, &verdict);
        assert_eq!(event.event_type(), "transition_rejected");
        match event {
            ContentEvent::TransitionRejected { reasons, kind, .. } => {
                assert_eq!(kind, EntityKind::Trek);
                assert_eq!(reasons, verdict.reasons);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn send(&self, _event: &ContentEvent) -> Result<(), ContentError> {
            Err(ContentError::IoError {
                path: "/dev/null/nope".into(),
                source: std::io::Error::other("boom"),
            })
        }
    }

    #[test]
    fn dispatcher_continues_past_failing_sink() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let dispatcher = EventDispatcher::new()
            .with_sink(Box::new(FailingSink))
            .with_sink(Box::new(LogSink::new(&path)));
        dispatcher.dispatch(&ContentEvent::status_changed(
            9,
            TrekStatus::Published,
            TrekStatus::Seasonal,
        ));

        assert!(fs::read_to_string(&path).unwrap().contains("seasonal"));
    }
}
