//! Engine configuration.
//!
//! Loaded once at startup, validated, then shared read-only. Every invariant
//! below is checked by [`EngineConfig::validate`]; a config that fails it
//! never reaches a scoring call.

use crate::action_weights::ActionWeightTable;
use crate::error::ConfigError;
use nomos_determinacy_types::{EngineId, EngineMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Tolerance applied to every "weights sum to 1" check.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine identifiers scored in environmental mode.
    pub environmental_engines: BTreeSet<String>,
    pub standard: StandardWeights,
    pub environmental: EnvironmentalWeights,
    pub ipat: IpatConfig,
    pub noise: NoiseConfig,
    pub adaptation: AdaptationConfig,
    pub action_weights: ActionWeightTable,
    pub gate: GateConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environmental_engines: ["carbon", "climate"]
                .into_iter()
                .map(String::from)
                .collect(),
            standard: StandardWeights::default(),
            environmental: EnvironmentalWeights::default(),
            ipat: IpatConfig::default(),
            noise: NoiseConfig::default(),
            adaptation: AdaptationConfig::default(),
            action_weights: ActionWeightTable::default(),
            gate: GateConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing sections take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            action_table_version = config.action_weights.version,
            ipat_enabled = config.ipat.enabled,
            "Engine configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.standard.validate()?;
        self.environmental.validate()?;
        self.ipat.validate()?;
        self.noise.validate()?;
        self.adaptation.validate()?;
        self.action_weights.validate()?;
        self.gate.validate()?;
        Ok(())
    }

    /// Resolve the scoring mode for an engine identifier.
    pub fn mode_for(&self, engine_id: &EngineId) -> EngineMode {
        let id = engine_id.as_str().trim();
        if self
            .environmental_engines
            .iter()
            .any(|e| e.eq_ignore_ascii_case(id))
        {
            EngineMode::Environmental
        } else {
            EngineMode::Standard
        }
    }
}

fn check_profile(
    profile: &'static str,
    weights: &[(&'static str, f64)],
) -> Result<(), ConfigError> {
    for &(name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeight {
                profile,
                name,
                value,
            });
        }
    }
    let sum: f64 = weights.iter().map(|(_, v)| v).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::WeightSum {
            profile,
            sum,
            tolerance: WEIGHT_SUM_TOLERANCE,
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveNormalization { name, value })
    }
}

/// Standard-mode weights: `Dt = c·C + t·R + i·I + ε`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardWeights {
    #[serde(alias = "consistencyWeight")]
    pub consistency_weight: f64,
    #[serde(alias = "timingWeight")]
    pub timing_weight: f64,
    #[serde(alias = "intentWeight")]
    pub intent_weight: f64,
}

impl Default for StandardWeights {
    fn default() -> Self {
        Self {
            consistency_weight: 0.35,
            timing_weight: 0.30,
            intent_weight: 0.35,
        }
    }
}

impl StandardWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_profile(
            "standard",
            &[
                ("consistency_weight", self.consistency_weight),
                ("timing_weight", self.timing_weight),
                ("intent_weight", self.intent_weight),
            ],
        )
    }
}

/// Environmental-mode weights over C, R, I, fairness and adaptation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalWeights {
    #[serde(alias = "consistencyWeight")]
    pub consistency_weight: f64,
    #[serde(alias = "timingWeight")]
    pub timing_weight: f64,
    #[serde(alias = "intentWeight")]
    pub intent_weight: f64,
    #[serde(alias = "fairnessWeight")]
    pub fairness_weight: f64,
    #[serde(alias = "adaptationWeight")]
    pub adaptation_weight: f64,
}

impl Default for EnvironmentalWeights {
    fn default() -> Self {
        Self {
            consistency_weight: 0.25,
            timing_weight: 0.20,
            intent_weight: 0.20,
            fairness_weight: 0.20,
            adaptation_weight: 0.15,
        }
    }
}

impl EnvironmentalWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_profile(
            "environmental",
            &[
                ("consistency_weight", self.consistency_weight),
                ("timing_weight", self.timing_weight),
                ("intent_weight", self.intent_weight),
                ("fairness_weight", self.fairness_weight),
                ("adaptation_weight", self.adaptation_weight),
            ],
        )
    }
}

/// IPAT impact correction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpatConfig {
    /// Initial value of the runtime toggle.
    pub enabled: bool,
    /// Unique members at which the population factor saturates.
    pub population_norm: f64,
    /// Distinct action types at which the technology factor saturates.
    pub technology_norm: f64,
}

impl Default for IpatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            population_norm: 100.0,
            technology_norm: 10.0,
        }
    }
}

impl IpatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("ipat.population_norm", self.population_norm)?;
        check_positive("ipat.technology_norm", self.technology_norm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// ε is drawn from `[-amplitude, amplitude)`.
    pub amplitude: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self { amplitude: 0.1 }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.amplitude.is_finite() && self.amplitude >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidNoiseAmplitude(self.amplitude))
        }
    }
}

/// Blend of the four adaptation components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationConfig {
    pub growth_weight: f64,
    pub volume_weight: f64,
    pub diversity_weight: f64,
    pub impact_weight: f64,
    /// Event count at which the volume component saturates.
    pub volume_norm: f64,
    /// Distinct action types at which the diversity component saturates.
    pub diversity_norm: f64,
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            growth_weight: 0.4,
            volume_weight: 0.2,
            diversity_weight: 0.2,
            impact_weight: 0.2,
            volume_norm: 50.0,
            diversity_norm: 10.0,
        }
    }
}

impl AdaptationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_profile(
            "adaptation",
            &[
                ("growth_weight", self.growth_weight),
                ("volume_weight", self.volume_weight),
                ("diversity_weight", self.diversity_weight),
                ("impact_weight", self.impact_weight),
            ],
        )?;
        check_positive("adaptation.volume_norm", self.volume_norm)?;
        check_positive("adaptation.diversity_norm", self.diversity_norm)
    }
}

/// Participation gate, sanction and proof-bonus constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum score for governance participation (inclusive).
    pub threshold: f64,
    /// Score deducted per rule violation.
    pub sanction_penalty: f64,
    /// Ceiling applied after a severe violation.
    pub severe_cap: f64,
    /// Multiplier for a verified proof.
    pub proof_bonus: f64,
    /// Multiplier for a verified proof that follows the previous one closely.
    pub rapid_proof_bonus: f64,
    /// Window, in seconds, for the rapid proof bonus.
    pub rapid_proof_window_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.82,
            sanction_penalty: 0.1,
            severe_cap: 0.1,
            proof_bonus: 1.2,
            rapid_proof_bonus: 1.5,
            rapid_proof_window_secs: 600,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        let unit = [
            ("gate.sanction_penalty", self.sanction_penalty),
            ("gate.severe_cap", self.severe_cap),
        ];
        for (name, value) in unit {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidGateParameter { name, value });
            }
        }
        let bonuses = [
            ("gate.proof_bonus", self.proof_bonus),
            ("gate.rapid_proof_bonus", self.rapid_proof_bonus),
        ];
        for (name, value) in bonuses {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidGateParameter { name, value });
            }
        }
        Ok(())
    }
}
