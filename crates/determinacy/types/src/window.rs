use crate::ids::{Timestamp, NANOS_PER_SECOND};
use serde::{Deserialize, Serialize};

/// Lookback horizon, in seconds, supplied by the caller per invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindow(pub u64);

impl TimeWindow {
    pub fn seconds(secs: u64) -> Self {
        Self(secs)
    }

    pub fn hours(hours: u64) -> Self {
        Self(hours.saturating_mul(3600))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Window length in nanoseconds, saturating at `i64::MAX`.
    pub fn as_nanos(&self) -> i64 {
        i64::try_from(self.0)
            .unwrap_or(i64::MAX)
            .saturating_mul(NANOS_PER_SECOND)
    }

    /// Inclusive bounds `[now - window, now]`.
    pub fn bounds(&self, now: Timestamp) -> WindowBounds {
        WindowBounds {
            start: now.saturating_sub(self.as_nanos()),
            end: now,
        }
    }
}

/// Inclusive time interval in nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowBounds {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl WindowBounds {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        t >= self.start && t <= self.end
    }

    pub fn span(&self) -> i64 {
        self.end.saturating_sub(self.start).max(0)
    }

    /// Split point between the earlier and the later half.
    pub fn midpoint(&self) -> Timestamp {
        self.start.saturating_add(self.span() / 2)
    }
}

/// A time window annotated with externally sourced quantum random bits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumTimeWindow {
    #[serde(alias = "startTime")]
    pub start_time: Timestamp,
    #[serde(alias = "endTime")]
    pub end_time: Timestamp,
    #[serde(alias = "quantumBits")]
    pub quantum_bits: Vec<bool>,
}

impl QuantumTimeWindow {
    pub fn new(start_time: Timestamp, end_time: Timestamp, quantum_bits: Vec<bool>) -> Self {
        Self {
            start_time,
            end_time,
            quantum_bits,
        }
    }

    pub fn bounds(&self) -> WindowBounds {
        WindowBounds::new(self.start_time, self.end_time)
    }
}

/// Fraction of set bits; 0 for an empty sequence.
pub fn set_ratio(bits: &[bool]) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    let set = bits.iter().filter(|b| **b).count();
    set as f64 / bits.len() as f64
}
