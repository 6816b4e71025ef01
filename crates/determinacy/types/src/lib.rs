//! # nomos-determinacy-types
//!
//! Plain data shared by the determinacy engine and its callers.
//!
//! Everything here is created fresh per scoring request and is immutable once
//! built: events are never rewritten by the engine, results are values.
//!
//! ## Contents
//!
//! - **Identity**: [`MemberId`], [`EngineId`], [`Timestamp`]
//! - **Events**: [`Event`] with its pre-assigned action weight
//! - **Windows**: [`TimeWindow`] (lookback horizon), [`WindowBounds`],
//!   [`QuantumTimeWindow`] (externally sourced random bits)
//! - **Requests**: [`ScoreRequest`]
//! - **Results**: [`DeterminacyResult`], [`BehavioralMetrics`],
//!   [`EnvironmentalMetrics`], [`IpatFactors`], [`IpatResult`],
//!   [`MemberDeterminacy`]

#![deny(unsafe_code)]

pub mod event;
pub mod ids;
pub mod mode;
pub mod request;
pub mod result;
pub mod window;

pub use event::{base_action, cohort_tag, Event, ImpactLevel, IMPACT_METADATA_KEY};
pub use ids::{EngineId, MemberId, Timestamp, NANOS_PER_SECOND};
pub use mode::EngineMode;
pub use request::ScoreRequest;
pub use result::{
    BehavioralMetrics, DeterminacyResult, EnvironmentalMetrics, IpatFactors, IpatResult,
    MemberDeterminacy,
};
pub use window::{set_ratio, QuantumTimeWindow, TimeWindow, WindowBounds};
