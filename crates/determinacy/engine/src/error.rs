use thiserror::Error;

/// Fatal configuration errors. Raised only while loading or validating an
/// [`EngineConfig`](crate::config::EngineConfig); never during scoring.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{profile} weights sum to {sum}, expected 1.0 (±{tolerance})")]
    WeightSum {
        profile: &'static str,
        sum: f64,
        tolerance: f64,
    },

    #[error("{profile} weight `{name}` is negative or not finite: {value}")]
    InvalidWeight {
        profile: &'static str,
        name: &'static str,
        value: f64,
    },

    #[error("normalization constant `{name}` must be positive, got {value}")]
    NonPositiveNormalization { name: &'static str, value: f64 },

    #[error("noise amplitude must be finite and non-negative, got {0}")]
    InvalidNoiseAmplitude(f64),

    #[error("action weight table is empty")]
    EmptyActionTable,

    #[error("action `{action}` has weight {weight} outside [0, 1]")]
    ActionWeightOutOfRange { action: String, weight: f64 },

    #[error("action weight table has no positive weight")]
    ZeroMaxActionWeight,

    #[error("participation threshold {0} outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("gate parameter `{name}` is invalid: {value}")]
    InvalidGateParameter { name: &'static str, value: f64 },

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Refusals from the participation gate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("score {score} is below the participation threshold {threshold}")]
    BelowThreshold { score: f64, threshold: f64 },
}

/// Events refused at ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    #[error("event for `{member}` at {timestamp} precedes the last recorded event at {last}")]
    OutOfOrder {
        member: String,
        timestamp: i64,
        last: i64,
    },

    #[error("event weight {0} outside [0, 1]")]
    InvalidEventWeight(f64),
}

/// Recoverable input problems. They are logged and clamped, never returned
/// to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputWarning {
    #[error("event weight {weight} for `{action}` outside [0, 1], clamped")]
    WeightOutOfRange { action: String, weight: f64 },

    #[error("noise {value} outside [-{amplitude}, {amplitude}), clamped")]
    NoiseOutOfRange { value: f64, amplitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_sum_display() {
        let err = ConfigError::WeightSum {
            profile: "environmental",
            sum: 0.95,
            tolerance: 1e-6,
        };
        let msg = err.to_string();
        assert!(msg.contains("environmental"));
        assert!(msg.contains("0.95"));
    }

    #[test]
    fn warning_display() {
        let w = InputWarning::WeightOutOfRange {
            action: "vote".into(),
            weight: 1.4,
        };
        assert!(w.to_string().contains("vote"));
    }
}
