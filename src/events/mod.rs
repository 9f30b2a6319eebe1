//! Event sinks used by callers to surface schedule warnings.

pub mod jsonl;
pub mod recorder;

use crate::cronjob::ObjectReference;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use jsonl::JsonlEventLog;
pub use recorder::FakeRecorder;

pub const REASON_TOO_MANY_MISSED_TIMES: &str = "TooManyMissedTimes";
pub const REASON_INVALID_SCHEDULE: &str = "InvalidSchedule";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Normal,
    Warning,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait EventRecorder {
    fn event(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str);
}

impl<R: EventRecorder + ?Sized> EventRecorder for &R {
    fn event(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        (**self).event(object, event_type, reason, message);
    }
}
