use crate::ids::{EngineId, MemberId};
use crate::mode::EngineMode;
use serde::{Deserialize, Serialize};

/// The three behavioral sub-scores, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralMetrics {
    pub consistency: f64,
    pub regularity: f64,
    pub intent_strength: f64,
}

/// Environmental-mode sub-scores, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMetrics {
    pub fairness: f64,
    pub adaptation: f64,
}

/// Population / Affluence / Technology factors plus the adaptation score
/// that dampens them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IpatFactors {
    pub population: f64,
    pub affluence: f64,
    pub technology: f64,
    pub adaptations: f64,
}

/// Outcome of the IPAT impact correction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IpatResult {
    pub factors: IpatFactors,
    /// `(P × A × T) / (1 + adaptation)`; non-negative.
    pub impact: f64,
    /// Environmental score before correction.
    pub base_determinacy: f64,
    /// Never greater than `base_determinacy`.
    pub adjusted_determinacy: f64,
}

/// Full outcome of one scoring call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeterminacyResult {
    pub member_id: MemberId,
    pub engine_id: EngineId,
    pub mode: EngineMode,
    pub behavioral: BehavioralMetrics,
    /// Present only in environmental mode.
    pub environmental: Option<EnvironmentalMetrics>,
    /// Noise term actually injected.
    pub noise: f64,
    /// Composed score after noise, clamped to [0, 1].
    pub base_dt: f64,
    /// Present when the IPAT correction was applied.
    pub ipat: Option<IpatResult>,
    /// Present on the quantum-window path.
    pub quantum_multiplier: Option<f64>,
    /// Final score in [0, 1].
    pub determinacy: f64,
    /// Number of events inside the window.
    pub event_count: u64,
}

impl DeterminacyResult {
    /// Final score.
    pub fn score(&self) -> f64 {
        self.determinacy
    }

    pub fn fairness_score(&self) -> Option<f64> {
        self.environmental.map(|e| e.fairness)
    }

    pub fn adaptation_score(&self) -> Option<f64> {
        self.environmental.map(|e| e.adaptation)
    }
}

/// Running per-member aggregate.
///
/// Scoring windows look back in time, so consecutive windows overlap and
/// re-include events. The aggregate therefore never sums event counts:
/// `event_count` is the size of the most recent window and
/// `average_determinacy` is the mean over scored windows. Recomputed by
/// callers whenever a window is scored; the engine never stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberDeterminacy {
    #[serde(alias = "memberId")]
    pub member_id: MemberId,
    #[serde(alias = "averageDeterminacy")]
    pub average_determinacy: f64,
    /// Events in the most recently scored window.
    #[serde(alias = "eventCount")]
    pub event_count: u64,
    #[serde(default, alias = "scoredWindows")]
    pub scored_windows: u64,
}

impl MemberDeterminacy {
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            average_determinacy: 0.0,
            event_count: 0,
            scored_windows: 0,
        }
    }

    /// Fold the score of one window holding `events` events.
    ///
    /// A window with no events carries no evidence and leaves the aggregate
    /// unchanged.
    pub fn record(&self, score: f64, events: u64) -> Self {
        if events == 0 {
            return self.clone();
        }
        let score = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let windows = self.scored_windows.saturating_add(1);
        let average = self.average_determinacy
            + (score - self.average_determinacy) / windows as f64;
        Self {
            member_id: self.member_id.clone(),
            average_determinacy: average.clamp(0.0, 1.0),
            event_count: events,
            scored_windows: windows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_average_is_per_window() {
        let m = MemberDeterminacy::new(MemberId::new("m"));
        let m = m.record(0.9, 3);
        assert_eq!(m.event_count, 3);
        assert_eq!(m.scored_windows, 1);
        assert!((m.average_determinacy - 0.9).abs() < 1e-12);

        let m = m.record(0.5, 1);
        assert_eq!(m.event_count, 1);
        assert_eq!(m.scored_windows, 2);
        assert!((m.average_determinacy - 0.7).abs() < 1e-12);
    }

    #[test]
    fn rescoring_a_window_does_not_inflate_counts() {
        let mut m = MemberDeterminacy::new(MemberId::new("m"));
        for _ in 0..3 {
            m = m.record(0.6, 10);
        }
        assert_eq!(m.event_count, 10);
        assert_eq!(m.scored_windows, 3);
        assert!((m.average_determinacy - 0.6).abs() < 1e-12);
    }

    #[test]
    fn aggregate_reads_camel_case_without_window_count() {
        let json = r#"{"memberId":"m","averageDeterminacy":0.4,"eventCount":7}"#;
        let m: MemberDeterminacy = serde_json::from_str(json).unwrap();
        assert_eq!(m.event_count, 7);
        assert_eq!(m.scored_windows, 0);
    }

    #[test]
    fn empty_score_does_not_move_average() {
        let m = MemberDeterminacy::new(MemberId::new("m")).record(0.7, 2);
        let same = m.record(0.0, 0);
        assert_eq!(same, m);
    }

    #[test]
    fn non_finite_score_counts_as_zero() {
        let m = MemberDeterminacy::new(MemberId::new("m")).record(f64::NAN, 1);
        assert_eq!(m.average_determinacy, 0.0);
        assert_eq!(m.event_count, 1);
        assert_eq!(m.scored_windows, 1);
    }

    #[test]
    fn result_accessors() {
        let result = DeterminacyResult {
            member_id: MemberId::new("m"),
            engine_id: EngineId::new("climate"),
            mode: EngineMode::Environmental,
            behavioral: BehavioralMetrics::default(),
            environmental: Some(EnvironmentalMetrics {
                fairness: 0.4,
                adaptation: 0.6,
            }),
            noise: 0.0,
            base_dt: 0.5,
            ipat: None,
            quantum_multiplier: None,
            determinacy: 0.5,
            event_count: 4,
        };
        assert_eq!(result.score(), 0.5);
        assert_eq!(result.fairness_score(), Some(0.4));
        assert_eq!(result.adaptation_score(), Some(0.6));

        let json = serde_json::to_string(&result).unwrap();
        let restored: DeterminacyResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, result);
    }
}
