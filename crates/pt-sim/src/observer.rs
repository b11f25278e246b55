//! Observer trait for the rendering and UI collaborators.

use pt_contagion::HealthTransition;
use pt_core::{AgentId, TileCoord};
use pt_movement::DoorEvent;
use pt_schedule::BuildingStatusChange;

use crate::MoraleStats;

/// Callbacks invoked by [`Sim`][crate::Sim] as state changes.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Every callback names the tile it
/// concerns; inactive tiles report too, when offscreen catch-up changes them.
///
/// # Example — death counter
///
/// ```rust
/// use pt_agent::HealthState;
/// use pt_contagion::HealthTransition;
/// use pt_core::TileCoord;
/// use pt_sim::AgentObserver;
///
/// #[derive(Default)]
/// struct Deaths(usize);
///
/// impl AgentObserver for Deaths {
///     fn on_health_change(&mut self, _tile: TileCoord, t: &HealthTransition) {
///         if t.to == HealthState::Deceased {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait AgentObserver {
    /// A tile became the active (rendered) tile.
    fn on_tile_activated(&mut self, _tile: TileCoord) {}

    /// An agent changed health state.
    fn on_health_change(&mut self, _tile: TileCoord, _transition: &HealthTransition) {}

    /// An agent entered or left a building.
    fn on_door(&mut self, _tile: TileCoord, _agent: AgentId, _event: DoorEvent) {}

    /// A building's infection status changed after an aggregator pass.
    fn on_building_status(&mut self, _tile: TileCoord, _change: &BuildingStatusChange) {}

    /// Morale aggregates of the active tile, at the stats cadence.
    fn on_morale(&mut self, _tile: TileCoord, _stats: &MoraleStats) {}
}

/// An [`AgentObserver`] that does nothing.
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}
