//! Environmental sub-scores: fairness across cohorts and adaptation over
//! the window.

use crate::config::AdaptationConfig;
use crate::slice::{unit, EventSlice};
use nomos_determinacy_types::EnvironmentalMetrics;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Balance of participation across cohort tags.
///
/// One minus the normalized dispersion of per-cohort counts:
/// `1 - min(1, cv / √(k-1))`, where `cv` is the coefficient of variation
/// over the `k` observed cohorts. `√(k-1)` is the largest `cv` possible, so
/// an even spread scores 1 and all activity in one cohort scores 0.
/// Fewer than two cohorts score 0: nothing to be fair between.
pub fn fairness(slice: &EventSlice<'_>) -> f64 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in slice.iter() {
        if let Some(tag) = event.cohort() {
            *counts.entry(tag).or_default() += 1;
        }
    }
    let k = counts.len();
    if k < 2 {
        return 0.0;
    }

    let k_f = k as f64;
    let mean = counts.values().sum::<usize>() as f64 / k_f;
    let variance = counts
        .values()
        .map(|c| (*c as f64 - mean).powi(2))
        .sum::<f64>()
        / k_f;
    let cv = variance.sqrt() / mean;
    unit(1.0 - (cv / (k_f - 1.0).sqrt()).min(1.0))
}

/// Components that feed the adaptation blend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdaptationComponents {
    pub growth: f64,
    pub volume: f64,
    pub diversity: f64,
    pub impact: f64,
}

impl AdaptationComponents {
    pub fn compute(slice: &EventSlice<'_>, config: &AdaptationConfig) -> Self {
        if slice.is_empty() {
            return Self::default();
        }
        let n = slice.len() as f64;
        let midpoint = slice.bounds().midpoint();

        let mut earlier = BTreeSet::new();
        let mut later = BTreeSet::new();
        for event in slice.iter() {
            if event.timestamp < midpoint {
                earlier.insert(event.action_type.as_str());
            } else {
                later.insert(event.action_type.as_str());
            }
        }
        let earlier_n = earlier.len() as f64;
        let g = (later.len() as f64 - earlier_n) / earlier_n.max(1.0);

        let impact_sum: f64 = slice
            .iter()
            .map(|e| e.impact_indicator().unwrap_or(0.0))
            .sum();

        Self {
            growth: unit((g + 1.0) / 2.0),
            volume: (n / config.volume_norm).min(1.0),
            diversity: (slice.distinct_action_types() as f64 / config.diversity_norm).min(1.0),
            impact: unit(impact_sum / n),
        }
    }

    pub fn blend(&self, config: &AdaptationConfig) -> f64 {
        unit(
            config.growth_weight * self.growth
                + config.volume_weight * self.volume
                + config.diversity_weight * self.diversity
                + config.impact_weight * self.impact,
        )
    }
}

/// Growth in engagement and impact across the window, in [0, 1].
pub fn adaptation(slice: &EventSlice<'_>, config: &AdaptationConfig) -> f64 {
    AdaptationComponents::compute(slice, config).blend(config)
}

pub fn environmental_metrics(
    slice: &EventSlice<'_>,
    config: &AdaptationConfig,
) -> EnvironmentalMetrics {
    let metrics = EnvironmentalMetrics {
        fairness: fairness(slice),
        adaptation: adaptation(slice, config),
    };
    debug!(
        fairness = metrics.fairness,
        adaptation = metrics.adaptation,
        "Environmental metrics computed"
    );
    metrics
}
