//! Consumer-side helpers built on a determinacy score: the governance
//! participation gate, licenses, sanctions and the proof bonus.
//!
//! None of these feed back into scoring.

use crate::config::GateConfig;
use crate::error::{ConfigError, GateError};
use crate::slice::unit;
use nomos_determinacy_types::{MemberId, Timestamp, NANOS_PER_SECOND};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of checking a score against the participation threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    Eligible { score: f64 },
    Ineligible { score: f64, shortfall: f64 },
}

impl GateDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, GateDecision::Eligible { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticipationGate {
    threshold: f64,
}

impl Default for ParticipationGate {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}

impl ParticipationGate {
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            threshold: config.threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Inclusive: a score equal to the threshold is eligible.
    pub fn evaluate(&self, score: f64) -> GateDecision {
        if score >= self.threshold {
            GateDecision::Eligible { score }
        } else {
            GateDecision::Ineligible {
                score,
                shortfall: self.threshold - score,
            }
        }
    }

    /// Issue a participation license, refused below the threshold.
    pub fn issue(
        &self,
        member_id: MemberId,
        score: f64,
        now: Timestamp,
    ) -> Result<License, GateError> {
        if !self.evaluate(score).is_eligible() {
            return Err(GateError::BelowThreshold {
                score,
                threshold: self.threshold,
            });
        }
        info!(member = %member_id, score, "Participation license issued");
        Ok(License {
            member_id,
            status: LicenseStatus::Active,
            score,
            issued_at: now,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Active,
    Revoked,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub member_id: MemberId,
    pub status: LicenseStatus,
    /// Score at the last assessment.
    pub score: f64,
    pub issued_at: Timestamp,
}

impl License {
    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }

    /// Re-check against a fresh score. Falling below the threshold revokes;
    /// a revoked license is not reinstated here, callers issue a new one.
    pub fn reassess(&self, score: f64, gate: &ParticipationGate) -> License {
        let status = match (self.status, gate.evaluate(score).is_eligible()) {
            (LicenseStatus::Active, true) => LicenseStatus::Active,
            (LicenseStatus::Active, false) => {
                info!(member = %self.member_id, score, "Participation license revoked");
                LicenseStatus::Revoked
            }
            (LicenseStatus::Revoked, _) => LicenseStatus::Revoked,
        };
        License {
            member_id: self.member_id.clone(),
            status,
            score,
            issued_at: self.issued_at,
        }
    }
}

/// Deduct a penalty per violation; a severe violation caps the result.
pub fn apply_sanctions(score: f64, violations: u32, severe: bool, config: &GateConfig) -> f64 {
    let penalized = unit(score - config.sanction_penalty * f64::from(violations));
    if severe {
        penalized.min(config.severe_cap)
    } else {
        penalized
    }
}

/// Multiplier for verified off-chain proofs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProofBonus {
    bonus: f64,
    rapid_bonus: f64,
    rapid_window: i64,
}

impl Default for ProofBonus {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}

impl ProofBonus {
    pub fn from_config(config: &GateConfig) -> Self {
        let window_secs = i64::try_from(config.rapid_proof_window_secs).unwrap_or(i64::MAX);
        Self {
            bonus: config.proof_bonus,
            rapid_bonus: config.rapid_proof_bonus,
            rapid_window: window_secs.saturating_mul(NANOS_PER_SECOND),
        }
    }

    /// Unverified proofs leave the score alone. A verified proof multiplies
    /// it, more so when the previous proof was less than the rapid window
    /// (nanoseconds) earlier.
    pub fn apply(&self, score: f64, verified: bool, since_previous_proof: Option<i64>) -> f64 {
        if !verified {
            return score;
        }
        let rapid = since_previous_proof.is_some_and(|gap| (0..self.rapid_window).contains(&gap));
        let multiplier = if rapid { self.rapid_bonus } else { self.bonus };
        unit(score * multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * NANOS_PER_SECOND;

    #[test]
    fn threshold_is_inclusive() {
        let gate = ParticipationGate::default();
        assert!(gate.evaluate(0.82).is_eligible());
        assert!(gate.evaluate(0.95).is_eligible());
        match gate.evaluate(0.80) {
            GateDecision::Ineligible { shortfall, .. } => assert!((shortfall - 0.02).abs() < 1e-12),
            other => panic!("expected ineligible, got {other:?}"),
        }
    }

    #[test]
    fn gate_rejects_bad_threshold() {
        assert!(ParticipationGate::new(1.5).is_err());
        assert!(ParticipationGate::new(f64::NAN).is_err());
        assert_eq!(ParticipationGate::new(0.5).unwrap().threshold(), 0.5);
    }

    #[test]
    fn license_lifecycle() {
        let gate = ParticipationGate::default();
        assert!(matches!(
            gate.issue(MemberId::new("m"), 0.5, 0),
            Err(GateError::BelowThreshold { .. })
        ));

        let license = gate.issue(MemberId::new("m"), 0.9, 0).unwrap();
        assert!(license.is_active());

        let still = license.reassess(0.85, &gate);
        assert!(still.is_active());
        assert_eq!(still.score, 0.85);

        let revoked = still.reassess(0.7, &gate);
        assert_eq!(revoked.status, LicenseStatus::Revoked);
        assert!(!revoked.reassess(0.99, &gate).is_active());
    }

    #[test]
    fn sanctions() {
        let config = GateConfig::default();
        assert!((apply_sanctions(0.9, 2, false, &config) - 0.7).abs() < 1e-12);
        assert_eq!(apply_sanctions(0.2, 5, false, &config), 0.0);
        assert_eq!(apply_sanctions(0.9, 0, true, &config), 0.1);
        assert_eq!(apply_sanctions(0.05, 0, true, &config), 0.05);
    }

    #[test]
    fn proof_bonus() {
        let bonus = ProofBonus::default();
        assert_eq!(bonus.apply(0.5, false, None), 0.5);
        assert!((bonus.apply(0.5, true, None) - 0.6).abs() < 1e-12);
        assert!((bonus.apply(0.5, true, Some(5 * MINUTE)) - 0.75).abs() < 1e-12);
        assert!((bonus.apply(0.5, true, Some(10 * MINUTE)) - 0.6).abs() < 1e-12);
        assert_eq!(bonus.apply(0.9, true, Some(MINUTE)), 1.0);
    }

    #[test]
    fn decision_serializes_with_tag() {
        let json = serde_json::to_string(&GateDecision::Eligible { score: 0.9 }).unwrap();
        assert_eq!(json, r#"{"decision":"eligible","score":0.9}"#);
    }
}
