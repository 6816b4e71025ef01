//! Quantum weighting: scale a score by the entropy of externally sourced
//! random bits.

use crate::slice::unit;
use nomos_determinacy_types::set_ratio;

pub const MIN_MULTIPLIER: f64 = 1.0;
pub const MAX_MULTIPLIER: f64 = 1.5;

/// `1 - |ratio - 0.5| × 2` where `ratio` is the fraction of set bits.
/// Balanced bits give 1, uniform bits give 0, no bits give 0.
pub fn bit_entropy(bits: &[bool]) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    unit(1.0 - (set_ratio(bits) - 0.5).abs() * 2.0)
}

/// Multiplier in [1.0, 1.5].
pub fn quantum_weight(bits: &[bool]) -> f64 {
    (1.0 + bit_entropy(bits) * 0.5).clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
}

/// Scale a score by the multiplier and clamp back into [0, 1].
pub fn apply(score: f64, multiplier: f64) -> f64 {
    unit(score * multiplier)
}
