use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical time in nanoseconds. Monotonically non-decreasing per member.
pub type Timestamp = i64;

/// Nanoseconds in one second, used to convert window durations.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Opaque identity handle for a DAO member.
///
/// Stable across the member's lifetime; the engine only compares it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of the governance engine a score is requested for
/// (e.g. `"carbon"`, `"climate"`, `"default"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(pub String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EngineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EngineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        let member = MemberId::new("aaaaa-aa");
        let json = serde_json::to_string(&member).unwrap();
        assert_eq!(json, "\"aaaaa-aa\"");

        let engine: EngineId = serde_json::from_str("\"climate\"").unwrap();
        assert_eq!(engine.as_str(), "climate");
        assert_eq!(engine.to_string(), "climate");
    }
}
