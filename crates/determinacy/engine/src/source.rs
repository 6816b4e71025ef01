//! Event-store seam.
//!
//! The engine never fetches events itself; callers resolve a slice through
//! an [`EventSource`] and hand it over in a `ScoreRequest`.

use crate::error::IngestError;
use nomos_determinacy_types::{Event, MemberId, Timestamp, WindowBounds};
use std::collections::BTreeMap;
use tracing::debug;

pub trait EventSource {
    /// A member's events inside `bounds`, ordered by timestamp.
    fn events_for(&self, member_id: &MemberId, bounds: WindowBounds) -> Vec<Event>;

    /// Every member's events inside `bounds`, ordered by timestamp.
    fn events_in(&self, bounds: WindowBounds) -> Vec<Event>;
}

/// Append-only, in-memory event log.
///
/// Enforces the ingestion rules: weights in [0, 1] and per-member
/// timestamps that never go backwards.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventLog {
    events: Vec<Event>,
    last_seen: BTreeMap<MemberId, Timestamp>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Event) -> Result<(), IngestError> {
        check(&event, self.last_seen.get(&event.member_id).copied())?;
        self.push(event);
        Ok(())
    }

    /// Append a batch in timestamp order.
    ///
    /// All or nothing: the whole batch is checked first, and a refused event
    /// leaves the log untouched.
    pub fn extend<I>(&mut self, events: I) -> Result<usize, IngestError>
    where
        I: IntoIterator<Item = Event>,
    {
        let mut sorted: Vec<Event> = events.into_iter().collect();
        sorted.sort_by_key(|e| e.timestamp);

        let mut pending: BTreeMap<&MemberId, Timestamp> = BTreeMap::new();
        for event in &sorted {
            let last = pending
                .get(&event.member_id)
                .or_else(|| self.last_seen.get(&event.member_id))
                .copied();
            check(event, last)?;
            pending.insert(&event.member_id, event.timestamp);
        }

        let count = sorted.len();
        for event in sorted {
            self.push(event);
        }
        Ok(count)
    }

    fn push(&mut self, event: Event) {
        debug!(member = %event.member_id, action = %event.action_type, "Event appended");
        self.last_seen.insert(event.member_id.clone(), event.timestamp);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Span covering every stored event.
    pub fn span(&self) -> Option<WindowBounds> {
        let start = self.events.iter().map(|e| e.timestamp).min()?;
        let end = self.events.iter().map(|e| e.timestamp).max()?;
        Some(WindowBounds::new(start, end))
    }

    fn collect<F: Fn(&Event) -> bool>(&self, keep: F) -> Vec<Event> {
        let mut out: Vec<Event> = self.events.iter().filter(|&e| keep(e)).cloned().collect();
        out.sort_by_key(|e| e.timestamp);
        out
    }
}

/// Ingestion rules for one event, given the member's last recorded timestamp.
fn check(event: &Event, last: Option<Timestamp>) -> Result<(), IngestError> {
    if !(0.0..=1.0).contains(&event.weight) {
        return Err(IngestError::InvalidEventWeight(event.weight));
    }
    match last {
        Some(last) if event.timestamp < last => Err(IngestError::OutOfOrder {
            member: event.member_id.to_string(),
            timestamp: event.timestamp,
            last,
        }),
        _ => Ok(()),
    }
}

impl EventSource for InMemoryEventLog {
    fn events_for(&self, member_id: &MemberId, bounds: WindowBounds) -> Vec<Event> {
        self.collect(|e| &e.member_id == member_id && bounds.contains(e.timestamp))
    }

    fn events_in(&self, bounds: WindowBounds) -> Vec<Event> {
        self.collect(|e| bounds.contains(e.timestamp))
    }
}
