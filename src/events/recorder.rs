use super::{EventRecorder, EventType};
use crate::cronjob::ObjectReference;
use std::sync::Mutex;

/// In-memory recorder that keeps `"<Type> <Reason> <message>"` lines.
///
/// Events beyond `capacity` are dropped, mirroring a full buffered channel.
#[derive(Debug)]
pub struct FakeRecorder {
    capacity: usize,
    events: Mutex<Vec<String>>,
}

impl FakeRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<String> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn drain(&self) -> Vec<String> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventRecorder for FakeRecorder {
    fn event(&self, _object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        if events.len() < self.capacity {
            events.push(format!("{event_type} {reason} {message}"));
        }
    }
}
