//! Versioned action-type → weight table.
//!
//! Weights reflect the cost of an action (a proposal needs research and
//! social capital, a view needs nothing). They are stamped onto events at
//! ingestion; scoring reads `Event::weight` and only uses the table for the
//! intent normaliser.

use crate::error::ConfigError;
use nomos_determinacy_types::{base_action, Event, MemberId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SUBMIT_PROPOSAL: &str = "submit-proposal";
pub const SUBMIT_PROOF: &str = "submit-proof";
pub const DELIBERATE: &str = "deliberate";
pub const VOTE: &str = "vote";
pub const DELEGATE: &str = "delegate";
pub const VIEW: &str = "view";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionWeightTable {
    pub version: u32,
    pub weights: BTreeMap<String, f64>,
}

impl Default for ActionWeightTable {
    fn default() -> Self {
        let weights = [
            (SUBMIT_PROPOSAL, 1.0),
            (SUBMIT_PROOF, 0.9),
            (DELIBERATE, 0.7),
            (VOTE, 0.5),
            (DELEGATE, 0.3),
            (VIEW, 0.1),
        ]
        .into_iter()
        .map(|(action, weight)| (action.to_string(), weight))
        .collect();
        Self {
            version: 1,
            weights,
        }
    }
}

impl ActionWeightTable {
    pub fn new(version: u32, weights: BTreeMap<String, f64>) -> Self {
        Self { version, weights }
    }

    /// Largest configured weight; the IntentStrength normaliser.
    pub fn max_weight(&self) -> f64 {
        self.weights.values().copied().fold(0.0, f64::max)
    }

    /// Weight for an action type. Falls back to the base action when the
    /// type carries a cohort tag (`vote_JP` → `vote`).
    pub fn weight_for(&self, action_type: &str) -> Option<f64> {
        self.weights
            .get(action_type)
            .or_else(|| self.weights.get(base_action(action_type)))
            .copied()
    }

    /// Build an event with its weight taken from this table.
    /// Returns `None` for actions outside the vocabulary.
    pub fn stamp(
        &self,
        member_id: impl Into<MemberId>,
        action_type: &str,
        timestamp: Timestamp,
    ) -> Option<Event> {
        let weight = self.weight_for(action_type)?;
        Some(Event::new(member_id, action_type, timestamp, weight))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.is_empty() {
            return Err(ConfigError::EmptyActionTable);
        }
        for (action, weight) in &self.weights {
            if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
                return Err(ConfigError::ActionWeightOutOfRange {
                    action: action.clone(),
                    weight: *weight,
                });
            }
        }
        if self.max_weight() <= 0.0 {
            return Err(ConfigError::ZeroMaxActionWeight);
        }
        Ok(())
    }
}
