#![deny(unsafe_code)]
//! # nomos-determinacy-engine
//!
//! Scores how purposeful and predictable a member's behavior is, from a
//! time-windowed slice of recorded actions.
//!
//! Two modes, selected by engine identifier:
//! - **Standard**: consistency, regularity and intent strength
//! - **Environmental**: adds fairness across cohorts and adaptation, with an
//!   optional IPAT impact correction
//!
//! Every score lands in [0, 1]. Given the same events, configuration, IPAT
//! flag and noise source, the result is identical; see [`noise`] for how ε
//! is supplied.

pub mod action_weights;
pub mod behavioral;
pub mod composer;
pub mod config;
pub mod engine;
pub mod environmental;
pub mod error;
pub mod gate;
pub mod ipat;
pub mod noise;
pub mod quantum;
pub mod slice;
pub mod source;

pub use action_weights::ActionWeightTable;
pub use composer::{Composer, ScoringPolicy};
pub use config::{
    AdaptationConfig, EngineConfig, EnvironmentalWeights, GateConfig, IpatConfig, NoiseConfig,
    StandardWeights,
};
pub use engine::{DeterminacyEngine, IpatToggle};
pub use error::{ConfigError, GateError, IngestError, InputWarning};
pub use gate::{apply_sanctions, GateDecision, License, LicenseStatus, ParticipationGate, ProofBonus};
pub use noise::{FixedNoise, NoiseSource, QuantumBitsNoise, RandomNoise};
pub use slice::EventSlice;
pub use source::{EventSource, InMemoryEventLog};
