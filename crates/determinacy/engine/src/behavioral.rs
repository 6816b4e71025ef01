//! Behavioral sub-scores: consistency, regularity and intent strength.
//!
//! Each is a pure function of the event slice and lands in [0, 1]. An empty
//! slice scores 0 everywhere.

use crate::slice::{sanitized_weight, unit, EventSlice};
use nomos_determinacy_types::BehavioralMetrics;
use tracing::debug;

/// Focus on few action types.
///
/// `1 - (k - 1) / n` for `n` events over `k` distinct types: a member who
/// only votes scores 1, a member spreading thin across many types scores
/// low.
pub fn consistency(slice: &EventSlice<'_>) -> f64 {
    let n = slice.len();
    if n == 0 {
        return 0.0;
    }
    let k = slice.distinct_action_types();
    unit(1.0 - (k as f64 - 1.0) / n as f64)
}

/// Steadiness of timing.
///
/// `1 - min(1, σ² / μ²)` over consecutive inter-event intervals. Fewer than
/// two events, or a zero mean interval, score 0.
pub fn regularity(slice: &EventSlice<'_>) -> f64 {
    let timestamps: Vec<i64> = slice.timestamps().collect();
    if timestamps.len() < 2 {
        return 0.0;
    }
    let intervals: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]) as f64)
        .collect();

    let count = intervals.len() as f64;
    let mean = intervals.iter().sum::<f64>() / count;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = intervals.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count;
    let ratio = (variance / (mean * mean)).min(1.0);
    unit(1.0 - ratio)
}

/// Mean event weight over the table's maximum weight.
pub fn intent_strength(slice: &EventSlice<'_>, max_weight: f64) -> f64 {
    if slice.is_empty() || !max_weight.is_finite() || max_weight <= 0.0 {
        return 0.0;
    }
    let total: f64 = slice.iter().map(sanitized_weight).sum();
    unit(total / slice.len() as f64 / max_weight)
}

pub fn behavioral_metrics(slice: &EventSlice<'_>, max_weight: f64) -> BehavioralMetrics {
    let metrics = BehavioralMetrics {
        consistency: consistency(slice),
        regularity: regularity(slice),
        intent_strength: intent_strength(slice, max_weight),
    };
    debug!(
        events = slice.len(),
        consistency = metrics.consistency,
        regularity = metrics.regularity,
        intent = metrics.intent_strength,
        "Behavioral metrics computed"
    );
    metrics
}
