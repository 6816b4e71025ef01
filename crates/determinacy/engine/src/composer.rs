//! Weighted composition of sub-scores into a determinacy score.
//!
//! Order of operations:
//!
//! 1. weighted sum of the sub-scores for the mode
//! 2. add ε
//! 3. clamp to [0, 1]
//! 4. environmental mode with IPAT on: divide by `1 + impact`
//!
//! The quantum multiplier, when used, is applied by the caller afterwards.

use crate::behavioral::behavioral_metrics;
use crate::config::EngineConfig;
use crate::environmental::environmental_metrics;
use crate::ipat::{correct, ipat_factors};
use crate::noise::{bounded, NoiseSource};
use crate::slice::{unit, EventSlice};
use nomos_determinacy_types::{
    BehavioralMetrics, DeterminacyResult, EngineId, EngineMode, EnvironmentalMetrics, IpatResult,
    MemberId,
};
use tracing::debug;

/// Per-call scoring switches, read once at the start of a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub ipat_enabled: bool,
}

impl ScoringPolicy {
    pub fn with_ipat(enabled: bool) -> Self {
        Self {
            ipat_enabled: enabled,
        }
    }
}

/// Stateless composer over a validated configuration.
#[derive(Clone, Copy, Debug)]
pub struct Composer<'c> {
    config: &'c EngineConfig,
}

impl<'c> Composer<'c> {
    pub fn new(config: &'c EngineConfig) -> Self {
        Self { config }
    }

    /// `c·C + t·R + i·I`
    pub fn standard_sum(&self, b: &BehavioralMetrics) -> f64 {
        let w = &self.config.standard;
        w.consistency_weight * b.consistency
            + w.timing_weight * b.regularity
            + w.intent_weight * b.intent_strength
    }

    /// Standard terms plus fairness and adaptation.
    pub fn environmental_sum(&self, b: &BehavioralMetrics, e: &EnvironmentalMetrics) -> f64 {
        let w = &self.config.environmental;
        w.consistency_weight * b.consistency
            + w.timing_weight * b.regularity
            + w.intent_weight * b.intent_strength
            + w.fairness_weight * e.fairness
            + w.adaptation_weight * e.adaptation
    }

    /// Score the events of one slice.
    pub fn compose<N: NoiseSource + ?Sized>(
        &self,
        member_id: &MemberId,
        engine_id: &EngineId,
        slice: &EventSlice<'_>,
        policy: ScoringPolicy,
        noise: &mut N,
    ) -> DeterminacyResult {
        let mode = self.config.mode_for(engine_id);
        let behavioral = behavioral_metrics(slice, self.config.action_weights.max_weight());
        let amplitude = self.config.noise.amplitude;
        let epsilon = bounded(noise.draw(amplitude), amplitude);

        let (environmental, base_dt, ipat, determinacy) = match mode {
            EngineMode::Standard => {
                let base = unit(self.standard_sum(&behavioral) + epsilon);
                (None, base, None, base)
            }
            EngineMode::Environmental => {
                let env = environmental_metrics(slice, &self.config.adaptation);
                let raw = self.environmental_sum(&behavioral, &env) + epsilon;
                if policy.ipat_enabled {
                    let factors = ipat_factors(slice, env.adaptation, &self.config.ipat);
                    let ipat = correct(raw, factors);
                    (
                        Some(env),
                        ipat.base_determinacy,
                        Some(ipat),
                        ipat.adjusted_determinacy,
                    )
                } else {
                    let base = unit(raw);
                    (Some(env), base, None, base)
                }
            }
        };

        debug!(
            member = %member_id,
            engine = %engine_id,
            %mode,
            events = slice.len(),
            noise = epsilon,
            determinacy,
            "Determinacy composed"
        );

        DeterminacyResult {
            member_id: member_id.clone(),
            engine_id: engine_id.clone(),
            mode,
            behavioral,
            environmental,
            noise: epsilon,
            base_dt,
            ipat,
            quantum_multiplier: None,
            determinacy,
            event_count: slice.len() as u64,
        }
    }

    /// Environmental composition with the IPAT correction, regardless of
    /// mode or toggle.
    pub fn ipat<N: NoiseSource + ?Sized>(&self, slice: &EventSlice<'_>, noise: &mut N) -> IpatResult {
        let behavioral = behavioral_metrics(slice, self.config.action_weights.max_weight());
        let env = environmental_metrics(slice, &self.config.adaptation);
        let amplitude = self.config.noise.amplitude;
        let epsilon = bounded(noise.draw(amplitude), amplitude);
        let raw = self.environmental_sum(&behavioral, &env) + epsilon;
        correct(raw, ipat_factors(slice, env.adaptation, &self.config.ipat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::FixedNoise;
    use nomos_determinacy_types::{Event, NANOS_PER_SECOND};

    const HOUR: i64 = 3600 * NANOS_PER_SECOND;

    fn votes(n: usize) -> Vec<Event> {
        (0..n)
            .map(|i| Event::new("m", "vote", i as i64 * HOUR, 0.5))
            .collect()
    }

    #[test]
    fn standard_weighted_sum() {
        let config = EngineConfig::default();
        let composer = Composer::new(&config);
        let events = votes(10);
        let slice = EventSlice::all(&events);
        let result = composer.compose(
            &MemberId::new("m"),
            &EngineId::new("default"),
            &slice,
            ScoringPolicy::default(),
            &mut FixedNoise::zero(),
        );
        // C = 1, R = 1, I = 0.5
        let expected = 0.35 + 0.30 + 0.35 * 0.5;
        assert_eq!(result.mode, EngineMode::Standard);
        assert!((result.determinacy - expected).abs() < 1e-12);
        assert!(result.environmental.is_none());
        assert!(result.ipat.is_none());
        assert_eq!(result.event_count, 10);
    }

    #[test]
    fn noise_is_added_and_clamped() {
        let config = EngineConfig::default();
        let composer = Composer::new(&config);
        let events = votes(10);
        let slice = EventSlice::all(&events);
        let m = MemberId::new("m");
        let e = EngineId::new("default");
        let plus = composer.compose(&m, &e, &slice, ScoringPolicy::default(), &mut FixedNoise(0.05));
        assert!((plus.determinacy - 0.875).abs() < 1e-12);
        assert_eq!(plus.noise, 0.05);

        // out-of-range noise is clamped to the amplitude
        let big = composer.compose(&m, &e, &slice, ScoringPolicy::default(), &mut FixedNoise(0.9));
        assert_eq!(big.noise, 0.1);
        assert!((big.determinacy - 0.925).abs() < 1e-12);
    }

    #[test]
    fn environmental_mode_reports_extra_metrics() {
        let config = EngineConfig::default();
        let composer = Composer::new(&config);
        let events = vec![
            Event::new("u1", "climate_action_JP", 0, 0.8),
            Event::new("u2", "climate_action_US", HOUR, 0.9),
        ];
        let slice = EventSlice::all(&events);
        let result = composer.compose(
            &MemberId::new("u1"),
            &EngineId::new("climate"),
            &slice,
            ScoringPolicy::default(),
            &mut FixedNoise::zero(),
        );
        assert_eq!(result.mode, EngineMode::Environmental);
        let env = result.environmental.unwrap();
        assert!((env.fairness - 1.0).abs() < 1e-12);
        assert!(result.ipat.is_none());
        assert_eq!(result.base_dt, result.determinacy);
    }

    #[test]
    fn ipat_policy_never_raises_score() {
        let config = EngineConfig::default();
        let composer = Composer::new(&config);
        let events: Vec<Event> = (0..30)
            .map(|i| Event::new(format!("u{i}"), format!("action{}_JP", i % 7), i * HOUR, 0.9))
            .collect();
        let slice = EventSlice::all(&events);
        let m = MemberId::new("u0");
        let e = EngineId::new("carbon");
        let off = composer.compose(&m, &e, &slice, ScoringPolicy::with_ipat(false), &mut FixedNoise::zero());
        let on = composer.compose(&m, &e, &slice, ScoringPolicy::with_ipat(true), &mut FixedNoise::zero());
        let ipat = on.ipat.unwrap();
        assert!(ipat.impact > 0.0);
        assert!(on.determinacy < off.determinacy);
        assert!((ipat.base_determinacy - off.determinacy).abs() < 1e-12);
        assert!(ipat.adjusted_determinacy <= ipat.base_determinacy);
    }

    #[test]
    fn empty_slice_scores_only_noise() {
        let config = EngineConfig::default();
        let composer = Composer::new(&config);
        let slice = EventSlice::all(&[]);
        let result = composer.compose(
            &MemberId::new("m"),
            &EngineId::new("default"),
            &slice,
            ScoringPolicy::default(),
            &mut FixedNoise(0.04),
        );
        assert!((result.determinacy - 0.04).abs() < 1e-12);
        let result = composer.compose(
            &MemberId::new("m"),
            &EngineId::new("default"),
            &slice,
            ScoringPolicy::default(),
            &mut FixedNoise(-0.04),
        );
        assert_eq!(result.determinacy, 0.0);
    }
}
