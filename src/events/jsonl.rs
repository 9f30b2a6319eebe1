use super::{EventRecorder, EventType};
use crate::cronjob::ObjectReference;
use crate::shared::logging::append_json_log;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Appends every event as a JSON line to a log file.
#[derive(Debug, Clone)]
pub struct JsonlEventLog {
    path: PathBuf,
}

impl JsonlEventLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventRecorder for JsonlEventLog {
    fn event(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        let level = match event_type {
            EventType::Normal => "info",
            EventType::Warning => "warn",
        };
        let payload = serde_json::json!({
            "timestamp": Utc::now().timestamp(),
            "level": level,
            "event": event_type.as_str(),
            "reason": reason,
            "object": object.key(),
            "message": message,
        });
        append_json_log(&self.path, &payload);
    }
}
