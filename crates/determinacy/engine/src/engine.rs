use crate::composer::{Composer, ScoringPolicy};
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::gate::ParticipationGate;
use crate::noise::{NoiseSource, QuantumBitsNoise, RandomNoise};
use crate::quantum::{apply, quantum_weight};
use crate::slice::EventSlice;
use nomos_determinacy_types::{
    DeterminacyResult, EngineId, EngineMode, IpatResult, MemberDeterminacy, QuantumTimeWindow,
    ScoreRequest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared runtime switch for the IPAT correction.
///
/// Cloning yields another handle to the same flag. Scoring calls read it
/// exactly once, so a flip never splits a single call.
#[derive(Clone, Debug, Default)]
pub struct IpatToggle {
    enabled: Arc<AtomicBool>,
}

impl IpatToggle {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!(enabled, "IPAT correction toggled");
        }
    }
}

/// Determinacy scoring engine.
///
/// Holds a validated configuration and the IPAT toggle. Every scoring call
/// is a pure function of its request, that configuration, the toggle value
/// read at call start, and the noise source handed in.
#[derive(Clone, Debug)]
pub struct DeterminacyEngine {
    config: Arc<EngineConfig>,
    ipat: IpatToggle,
}

impl Default for DeterminacyEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let ipat = IpatToggle::new(config.ipat.enabled);
        Self {
            config: Arc::new(config),
            ipat,
        }
    }
}

impl DeterminacyEngine {
    /// Validate `config` and build an engine around it.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ipat = IpatToggle::new(config.ipat.enabled);
        info!(
            action_table_version = config.action_weights.version,
            ipat_enabled = config.ipat.enabled,
            noise_amplitude = config.noise.amplitude,
            "Determinacy engine initialized"
        );
        Ok(Self {
            config: Arc::new(config),
            ipat,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle to the IPAT switch; can be shared across threads.
    pub fn ipat_toggle(&self) -> IpatToggle {
        self.ipat.clone()
    }

    pub fn set_ipat_enabled(&self, enabled: bool) {
        self.ipat.set(enabled);
    }

    pub fn ipat_enabled(&self) -> bool {
        self.ipat.is_enabled()
    }

    /// Snapshot the switches for one call.
    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy::with_ipat(self.ipat.is_enabled())
    }

    pub fn mode_for(&self, engine_id: &EngineId) -> EngineMode {
        self.config.mode_for(engine_id)
    }

    pub fn gate(&self) -> ParticipationGate {
        ParticipationGate::from_config(&self.config.gate)
    }

    /// Score the request's events inside `[now - window, now]`.
    pub fn score<N: NoiseSource + ?Sized>(
        &self,
        request: &ScoreRequest,
        noise: &mut N,
    ) -> DeterminacyResult {
        self.score_with_policy(request, self.policy(), noise)
    }

    /// Score with thread-local random noise.
    pub fn score_random(&self, request: &ScoreRequest) -> DeterminacyResult {
        self.score(request, &mut RandomNoise::new())
    }

    /// Score under an explicit policy instead of the shared toggle.
    pub fn score_with_policy<N: NoiseSource + ?Sized>(
        &self,
        request: &ScoreRequest,
        policy: ScoringPolicy,
        noise: &mut N,
    ) -> DeterminacyResult {
        let slice = EventSlice::select(&request.events, request.bounds());
        Composer::new(&self.config).compose(
            &request.member_id,
            &request.engine_id,
            &slice,
            policy,
            noise,
        )
    }

    /// Score the events inside a quantum window.
    ///
    /// ε is derived from the window's bits, and the final score is scaled by
    /// the bit-entropy multiplier and re-clamped. The request's own
    /// `time_window` and `now` are ignored here.
    pub fn score_in_quantum_window(
        &self,
        request: &ScoreRequest,
        window: &QuantumTimeWindow,
    ) -> DeterminacyResult {
        let slice = EventSlice::select(&request.events, window.bounds());
        let mut noise = QuantumBitsNoise::new(&window.quantum_bits);
        let mut result = Composer::new(&self.config).compose(
            &request.member_id,
            &request.engine_id,
            &slice,
            self.policy(),
            &mut noise,
        );
        let multiplier = quantum_weight(&window.quantum_bits);
        result.determinacy = apply(result.determinacy, multiplier);
        result.quantum_multiplier = Some(multiplier);
        result
    }

    /// IPAT breakdown for the request's window, independent of mode and
    /// toggle.
    pub fn ipat_for<N: NoiseSource + ?Sized>(
        &self,
        request: &ScoreRequest,
        noise: &mut N,
    ) -> IpatResult {
        let slice = EventSlice::select(&request.events, request.bounds());
        Composer::new(&self.config).ipat(&slice, noise)
    }

    /// Fold a result into a member's running aggregate. The aggregate's
    /// event count becomes the result's window size; it is never summed.
    pub fn update_member(
        &self,
        previous: &MemberDeterminacy,
        result: &DeterminacyResult,
    ) -> MemberDeterminacy {
        if previous.member_id != result.member_id {
            warn!(
                aggregate = %previous.member_id,
                result = %result.member_id,
                "Result belongs to a different member, aggregate unchanged"
            );
            return previous.clone();
        }
        previous.record(result.determinacy, result.event_count)
    }
}
