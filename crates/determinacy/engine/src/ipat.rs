//! IPAT impact correction: `I = P × A × T`, dampened by adaptation.
//!
//! Higher impact pulls the environmental score down; adaptation softens the
//! pull. The correction can only lower a score.

use crate::config::IpatConfig;
use crate::slice::{unit, EventSlice};
use nomos_determinacy_types::{IpatFactors, IpatResult};
use tracing::debug;

/// Unique members over the population norm, capped at 1.
pub fn population(slice: &EventSlice<'_>, norm: f64) -> f64 {
    if norm <= 0.0 {
        return 0.0;
    }
    (slice.unique_members() as f64 / norm).min(1.0)
}

/// Mean event weight.
pub fn affluence(slice: &EventSlice<'_>) -> f64 {
    unit(slice.mean_weight())
}

/// Distinct action types over the technology norm, capped at 1.
pub fn technology(slice: &EventSlice<'_>, norm: f64) -> f64 {
    if norm <= 0.0 {
        return 0.0;
    }
    (slice.distinct_action_types() as f64 / norm).min(1.0)
}

pub fn ipat_factors(slice: &EventSlice<'_>, adaptation: f64, config: &IpatConfig) -> IpatFactors {
    IpatFactors {
        population: population(slice, config.population_norm),
        affluence: affluence(slice),
        technology: technology(slice, config.technology_norm),
        adaptations: unit(adaptation),
    }
}

/// `(P × A × T) / (1 + adaptation)`; never negative.
pub fn impact(factors: &IpatFactors) -> f64 {
    let pat = factors.population * factors.affluence * factors.technology;
    (pat / (1.0 + factors.adaptations.max(0.0))).max(0.0)
}

/// Apply the correction to an unclamped environmental score.
///
/// The raw score is clamped into `base_determinacy` first and the division
/// works on that, so a noisy raw score above 1 is still pulled below 1. The
/// adjusted score equals the base only when impact is 0 or the base is 0.
pub fn correct(raw: f64, factors: IpatFactors) -> IpatResult {
    let impact = impact(&factors);
    let base = unit(raw);
    let adjusted = unit(base / (1.0 + impact));
    debug!(
        population = factors.population,
        affluence = factors.affluence,
        technology = factors.technology,
        impact,
        base,
        adjusted,
        "IPAT correction applied"
    );
    IpatResult {
        factors,
        impact,
        base_determinacy: base,
        adjusted_determinacy: adjusted,
    }
}
