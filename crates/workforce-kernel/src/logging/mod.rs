//! Append-only audit trail of workforce commands.
//!
//! Each event is chained to its predecessor with SHA-256 so that any edit or
//! removal of history is detected by `verify_integrity`.

use crate::error::LogError;
use crate::types::EmployeeId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied,
    Rejected,
}

impl Outcome {
    fn as_u8(self) -> u8 {
        match self {
            Outcome::Applied => 0,
            Outcome::Rejected => 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub event_id: EventId,
    pub timestamp: u64,
    pub actor: Option<EmployeeId>,
    pub action: String,
    pub subject: String,
    pub outcome: Outcome,
    pub detail: String,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}

impl Event {
    pub fn new(
        actor: Option<EmployeeId>,
        action: impl Into<String>,
        subject: impl Into<String>,
        outcome: Outcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            timestamp: now_timestamp(),
            actor,
            action: action.into(),
            subject: subject.into(),
            outcome,
            detail: detail.into(),
            prev_hash: [0u8; 32],
            hash: [0u8; 32],
        }
    }
}

#[derive(Debug, Default)]
pub struct EventLog {
    inner: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn append(&self, mut event: Event) -> EventId {
        let mut guard = self.inner.lock();
        event.prev_hash = guard.last().map(|e| e.hash).unwrap_or([0u8; 32]);
        event.hash = compute_hash(&event);
        let id = event.event_id;
        guard.push(event);
        id
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn verify_integrity(&self) -> Result<usize, LogError> {
        let guard = self.inner.lock();
        verify_chain(&guard)?;
        Ok(guard.len())
    }

    #[cfg(test)]
    pub(crate) fn tamper<F: FnOnce(&mut Vec<Event>)>(&self, f: F) {
        f(&mut self.inner.lock());
    }
}

/// Recompute the hash chain over an exported slice of events.
pub fn verify_chain(events: &[Event]) -> Result<(), LogError> {
    let mut prev = [0u8; 32];
    for (index, e) in events.iter().enumerate() {
        if e.prev_hash != prev || e.hash != compute_hash(e) {
            return Err(LogError::IntegrityViolation { index });
        }
        prev = e.hash;
    }
    Ok(())
}

fn compute_hash(event: &Event) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.0.as_bytes());
    hasher.update(event.timestamp.to_le_bytes());
    if let Some(actor) = &event.actor {
        hasher.update(actor.as_str().as_bytes());
    }
    hasher.update([0]);
    hasher.update(event.action.as_bytes());
    hasher.update([0]);
    hasher.update(event.subject.as_bytes());
    hasher.update([0]);
    hasher.update([event.outcome.as_u8()]);
    hasher.update(event.detail.as_bytes());
    hasher.update([0]);
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}

pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
