use crate::event::Event;
use crate::ids::{EngineId, MemberId, Timestamp};
use crate::window::{TimeWindow, WindowBounds};
use serde::{Deserialize, Serialize};

/// Input to a scoring call: an already-resolved event slice plus the
/// window it should be read through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub member_id: MemberId,
    pub events: Vec<Event>,
    /// Lookback horizon in seconds.
    pub time_window: TimeWindow,
    pub engine_id: EngineId,
    /// End of the window (nanoseconds).
    pub now: Timestamp,
}

impl ScoreRequest {
    pub fn new(
        member_id: impl Into<MemberId>,
        events: Vec<Event>,
        time_window: TimeWindow,
        engine_id: impl Into<EngineId>,
        now: Timestamp,
    ) -> Self {
        Self {
            member_id: member_id.into(),
            events,
            time_window,
            engine_id: engine_id.into(),
            now,
        }
    }

    pub fn bounds(&self) -> WindowBounds {
        self.time_window.bounds(self.now)
    }
}
