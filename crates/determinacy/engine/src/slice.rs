use nomos_determinacy_types::{Event, Timestamp, WindowBounds};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::InputWarning;

/// A read-only, time-ordered view of the events inside one window.
///
/// Built once per scoring call; every calculator reads from it.
#[derive(Clone, Debug)]
pub struct EventSlice<'a> {
    events: Vec<&'a Event>,
    bounds: WindowBounds,
}

impl<'a> EventSlice<'a> {
    /// Keep the events inside `bounds` (inclusive), ordered by timestamp.
    pub fn select(events: &'a [Event], bounds: WindowBounds) -> Self {
        let mut selected: Vec<&Event> = events
            .iter()
            .filter(|e| bounds.contains(e.timestamp))
            .collect();
        selected.sort_by_key(|e| e.timestamp);
        Self {
            events: selected,
            bounds,
        }
    }

    /// Every event, with bounds spanning the first and last timestamp.
    pub fn all(events: &'a [Event]) -> Self {
        let start = events.iter().map(|e| e.timestamp).min().unwrap_or(0);
        let end = events.iter().map(|e| e.timestamp).max().unwrap_or(0);
        Self::select(events, WindowBounds::new(start, end))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn bounds(&self) -> WindowBounds {
        self.bounds
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().copied()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.events.iter().map(|e| e.timestamp)
    }

    /// Number of distinct `action_type` values.
    pub fn distinct_action_types(&self) -> usize {
        self.events
            .iter()
            .map(|e| e.action_type.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Number of distinct members.
    pub fn unique_members(&self) -> usize {
        self.events
            .iter()
            .map(|e| &e.member_id)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Mean of the sanitized event weights; 0 when empty.
    pub fn mean_weight(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        let total: f64 = self.events.iter().map(|e| sanitized_weight(e)).sum();
        total / self.events.len() as f64
    }
}

/// Event weight clamped to [0, 1]. Out-of-range input is logged, not
/// rejected; non-finite weights count as 0.
pub fn sanitized_weight(event: &Event) -> f64 {
    let w = event.weight;
    if (0.0..=1.0).contains(&w) {
        return w;
    }
    let warning = InputWarning::WeightOutOfRange {
        action: event.action_type.clone(),
        weight: w,
    };
    warn!(member = %event.member_id, "{}", warning);
    if w.is_finite() {
        w.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Clamp to [0, 1], mapping NaN to 0.
pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<Event> {
        vec![
            Event::new("a", "vote", 30, 0.5),
            Event::new("b", "vote", 10, 0.5),
            Event::new("a", "deliberate", 20, 0.7),
            Event::new("c", "view", 99, 0.1),
        ]
    }

    #[test]
    fn select_filters_and_orders() {
        let events = events();
        let slice = EventSlice::select(&events, WindowBounds::new(10, 30));
        let ts: Vec<_> = slice.timestamps().collect();
        assert_eq!(ts, vec![10, 20, 30]);
        assert_eq!(slice.distinct_action_types(), 2);
        assert_eq!(slice.unique_members(), 2);
    }

    #[test]
    fn all_spans_every_event() {
        let events = events();
        let slice = EventSlice::all(&events);
        assert_eq!(slice.len(), 4);
        assert_eq!(slice.bounds(), WindowBounds::new(10, 99));
    }

    #[test]
    fn empty_slice() {
        let slice = EventSlice::all(&[]);
        assert!(slice.is_empty());
        assert_eq!(slice.mean_weight(), 0.0);
        assert_eq!(slice.distinct_action_types(), 0);
    }

    #[test]
    fn out_of_range_weights_are_clamped() {
        assert_eq!(sanitized_weight(&Event::new("a", "vote", 0, 1.7)), 1.0);
        assert_eq!(sanitized_weight(&Event::new("a", "vote", 0, -0.2)), 0.0);
        assert_eq!(sanitized_weight(&Event::new("a", "vote", 0, f64::NAN)), 0.0);
        assert_eq!(sanitized_weight(&Event::new("a", "vote", 0, 0.4)), 0.4);
    }

    #[test]
    fn unit_clamp() {
        assert_eq!(unit(f64::NAN), 0.0);
        assert_eq!(unit(1.3), 1.0);
        assert_eq!(unit(-0.3), 0.0);
    }
}
