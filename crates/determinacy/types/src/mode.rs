use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring mode, resolved once per request from the engine identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Consistency, regularity and intent only.
    #[default]
    Standard,
    /// Adds fairness and adaptation; eligible for IPAT correction.
    Environmental,
}

impl EngineMode {
    pub fn is_environmental(&self) -> bool {
        matches!(self, Self::Environmental)
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Environmental => write!(f, "environmental"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_standard() {
        assert_eq!(EngineMode::default(), EngineMode::Standard);
        assert!(!EngineMode::Standard.is_environmental());
        assert!(EngineMode::Environmental.is_environmental());
        assert_eq!(EngineMode::Environmental.to_string(), "environmental");
    }
}
