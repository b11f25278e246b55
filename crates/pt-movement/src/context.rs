//! `MoveContext` — everything a movement step may read.

use pt_agent::AgentSnapshot;
use pt_core::{EngineConfig, SimSettings, is_night};
use pt_spatial::{SpatialHash, StaticLayer};

/// Read-only view of the active tile for one frame.
///
/// Constructed once per frame by the sim and shared by every agent step.
#[derive(Copy, Clone)]
pub struct MoveContext<'a> {
    pub layer:    &'a StaticLayer,
    pub agents:   &'a SpatialHash<AgentSnapshot>,
    pub config:   &'a EngineConfig,
    pub settings: &'a SimSettings,
    /// Current sim time, in sim-hours.
    pub now:      f64,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        layer:    &'a StaticLayer,
        agents:   &'a SpatialHash<AgentSnapshot>,
        config:   &'a EngineConfig,
        settings: &'a SimSettings,
        now:      f64,
    ) -> Self {
        Self { layer, agents, config, settings, now }
    }

    #[inline]
    pub fn is_night(&self) -> bool {
        is_night(self.settings.hour())
    }
}
