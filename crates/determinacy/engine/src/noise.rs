//! Noise sources for the ε term.
//!
//! The engine never reaches for a global RNG: every scoring call is handed a
//! [`NoiseSource`], so tests pin ε with [`FixedNoise`] and the quantum path
//! derives it from the window's bits.

use crate::error::InputWarning;
use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::warn;

/// Produces one ε per call, nominally in `[-amplitude, amplitude)`.
pub trait NoiseSource {
    fn draw(&mut self, amplitude: f64) -> f64;
}

/// Always returns the same value, independent of amplitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedNoise(pub f64);

impl FixedNoise {
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl NoiseSource for FixedNoise {
    fn draw(&mut self, _amplitude: f64) -> f64 {
        self.0
    }
}

/// Uniform noise from a `rand` generator.
#[derive(Clone, Debug)]
pub struct RandomNoise<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomNoise<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomNoise<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NoiseSource for RandomNoise<R> {
    fn draw(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 || !amplitude.is_finite() {
            return 0.0;
        }
        self.rng.gen_range(-amplitude..amplitude)
    }
}

/// Noise derived from externally sourced quantum bits.
///
/// Each draw reads up to 32 bits, most significant first, starting at a
/// cursor that wraps around the sequence. The bits form `u ∈ [0, 1)` and
/// ε = `amplitude × (2u - 1)`. An empty sequence yields 0.
#[derive(Clone, Debug)]
pub struct QuantumBitsNoise<'a> {
    bits: &'a [bool],
    cursor: usize,
}

const BITS_PER_DRAW: usize = 32;

impl<'a> QuantumBitsNoise<'a> {
    pub fn new(bits: &'a [bool]) -> Self {
        Self { bits, cursor: 0 }
    }
}

impl NoiseSource for QuantumBitsNoise<'_> {
    fn draw(&mut self, amplitude: f64) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        let len = self.bits.len().min(BITS_PER_DRAW);
        let mut value: u64 = 0;
        for offset in 0..len {
            let bit = self.bits[(self.cursor + offset) % self.bits.len()];
            value = (value << 1) | u64::from(bit);
        }
        self.cursor = (self.cursor + len) % self.bits.len();

        let u = value as f64 / (1u64 << len) as f64;
        amplitude * (2.0 * u - 1.0)
    }
}

/// Clamp a drawn ε into `[-amplitude, amplitude]`, logging anything outside.
pub fn bounded(value: f64, amplitude: f64) -> f64 {
    if !value.is_finite() {
        warn!("{}", InputWarning::NoiseOutOfRange { value, amplitude });
        return 0.0;
    }
    if value < -amplitude || value > amplitude {
        warn!("{}", InputWarning::NoiseOutOfRange { value, amplitude });
        return value.clamp(-amplitude, amplitude);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fixed_noise_ignores_amplitude() {
        let mut noise = FixedNoise(0.03);
        assert_eq!(noise.draw(0.1), 0.03);
        assert_eq!(noise.draw(0.0), 0.03);
        assert_eq!(FixedNoise::zero().draw(0.1), 0.0);
    }

    #[test]
    fn random_noise_stays_in_range() {
        let mut noise = RandomNoise::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let e = noise.draw(0.1);
            assert!((-0.1..0.1).contains(&e));
        }
        assert_eq!(noise.draw(0.0), 0.0);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let mut a = RandomNoise::with_rng(StdRng::seed_from_u64(42));
        let mut b = RandomNoise::with_rng(StdRng::seed_from_u64(42));
        for _ in 0..10 {
            assert_eq!(a.draw(0.1), b.draw(0.1));
        }
    }

    #[test]
    fn quantum_bits_map_to_range() {
        // 1000 -> u = 0.5 -> ε = 0
        let bits = [true, false, false, false];
        assert_eq!(QuantumBitsNoise::new(&bits).draw(0.1), 0.0);

        // 0000 -> u = 0 -> ε = -amplitude
        let bits = [false; 4];
        assert!((QuantumBitsNoise::new(&bits).draw(0.1) + 0.1).abs() < 1e-12);

        // 1111 -> u = 15/16 -> ε < amplitude
        let bits = [true; 4];
        let e = QuantumBitsNoise::new(&bits).draw(0.1);
        assert!((e - 0.1 * 0.875).abs() < 1e-12);
    }

    #[test]
    fn quantum_cursor_wraps() {
        let bits = [true, true, true, false];
        let mut noise = QuantumBitsNoise::new(&bits);
        let first = noise.draw(0.1);
        let second = noise.draw(0.1);
        assert_eq!(first, second);
    }

    #[test]
    fn long_sequences_read_in_chunks() {
        let mut bits = vec![false; 32];
        bits.extend(vec![true; 32]);
        let mut noise = QuantumBitsNoise::new(&bits);
        assert!((noise.draw(1.0) + 1.0).abs() < 1e-12);
        assert!(noise.draw(1.0) > 0.99);
    }

    #[test]
    fn empty_bits_yield_zero() {
        assert_eq!(QuantumBitsNoise::new(&[]).draw(0.1), 0.0);
    }

    #[test]
    fn bounded_clamps() {
        assert_eq!(bounded(0.05, 0.1), 0.05);
        assert_eq!(bounded(0.5, 0.1), 0.1);
        assert_eq!(bounded(-0.5, 0.1), -0.1);
        assert_eq!(bounded(f64::NAN, 0.1), 0.0);
    }
}
