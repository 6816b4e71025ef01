use crate::ids::{MemberId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key carrying an event's impact-level indicator.
pub const IMPACT_METADATA_KEY: &str = "impact";

/// One recorded action by a member.
///
/// `weight` is assigned at ingestion from the action-weight table and is
/// expected to lie in [0, 1]. Events are never mutated once recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "userId", alias = "memberId")]
    pub member_id: MemberId,
    /// Tag from the action vocabulary, optionally suffixed with a cohort
    /// tag (`climate_action_JP`).
    #[serde(alias = "actionType")]
    pub action_type: String,
    /// Nanosecond logical time.
    pub timestamp: Timestamp,
    pub weight: f64,
    /// Free-form annotations. `impact` carries the impact-level indicator.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Event {
    pub fn new(
        member_id: impl Into<MemberId>,
        action_type: impl Into<String>,
        timestamp: Timestamp,
        weight: f64,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            action_type: action_type.into(),
            timestamp,
            weight,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_impact(self, level: ImpactLevel) -> Self {
        self.with_metadata(IMPACT_METADATA_KEY, level.as_str())
    }

    /// Cohort (region or generation) tag embedded in the action type.
    pub fn cohort(&self) -> Option<&str> {
        cohort_tag(&self.action_type)
    }

    /// Impact indicator in [0, 1], if the event carries one.
    ///
    /// Accepts `low`/`medium`/`high` or a number (clamped).
    pub fn impact_indicator(&self) -> Option<f64> {
        let raw = self.metadata.get(IMPACT_METADATA_KEY)?;
        if let Some(level) = ImpactLevel::parse(raw) {
            return Some(level.score());
        }
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
    }
}

/// Coarse impact levels recorded by the ingestion layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn score(&self) -> f64 {
        match self {
            Self::Low => 1.0 / 3.0,
            Self::Medium => 2.0 / 3.0,
            Self::High => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Extract the cohort tag from an action type.
///
/// The tag is the segment after the last `_` when it is 2–5 characters of
/// ASCII uppercase letters or digits, starting with a letter.
pub fn cohort_tag(action_type: &str) -> Option<&str> {
    let (head, tag) = action_type.rsplit_once('_')?;
    if head.is_empty() || !(2..=5).contains(&tag.len()) {
        return None;
    }
    let mut chars = tag.chars();
    let first_is_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    if first_is_upper && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        Some(tag)
    } else {
        None
    }
}

/// Action type with any cohort tag stripped (`vote_EU` → `vote`).
pub fn base_action(action_type: &str) -> &str {
    match cohort_tag(action_type) {
        Some(tag) => &action_type[..action_type.len() - tag.len() - 1],
        None => action_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cohort_tags() {
        assert_eq!(cohort_tag("climate_action_JP"), Some("JP"));
        assert_eq!(cohort_tag("vote_GEN2"), Some("GEN2"));
        assert_eq!(cohort_tag("renewable_energy_US"), Some("US"));
        assert_eq!(cohort_tag("vote"), None);
        assert_eq!(cohort_tag("submit_proposal"), None);
        assert_eq!(cohort_tag("_JP"), None);
        assert_eq!(cohort_tag("vote_TOOLONG"), None);
        assert_eq!(cohort_tag("vote_2G"), None);
    }

    #[test]
    fn base_action_strips_tag() {
        assert_eq!(base_action("vote_EU"), "vote");
        assert_eq!(base_action("climate_action_GENZ"), "climate_action");
        assert_eq!(base_action("deliberate"), "deliberate");
        assert_eq!(base_action("submit_proposal"), "submit_proposal");
    }

    #[test]
    fn impact_indicator_parsing() {
        let e = Event::new("m", "vote", 0, 0.5).with_impact(ImpactLevel::High);
        assert_eq!(e.impact_indicator(), Some(1.0));

        let numeric = Event::new("m", "vote", 0, 0.5).with_metadata("impact", "1.7");
        assert_eq!(numeric.impact_indicator(), Some(1.0));

        let garbage = Event::new("m", "vote", 0, 0.5).with_metadata("impact", "huge");
        assert_eq!(garbage.impact_indicator(), None);

        assert_eq!(Event::new("m", "vote", 0, 0.5).impact_indicator(), None);
    }

    #[test]
    fn event_accepts_camel_case_fields() {
        let json = r#"{"userId":"aaaaa-aa","actionType":"climate_action_JP","timestamp":10,"weight":0.8}"#;
        let e: Event = serde_json::from_str(json).unwrap();
        assert_eq!(e.member_id.as_str(), "aaaaa-aa");
        assert_eq!(e.action_type, "climate_action_JP");
        assert!(e.metadata.is_empty());
    }
}
