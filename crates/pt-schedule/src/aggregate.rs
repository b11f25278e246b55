//! Building infection status.
//!
//! | Status           | When                                                      |
//! |------------------|-----------------------------------------------------------|
//! | `DeceasedPresent`| a corpse lies inside                                      |
//! | `Infected`       | an Infected agent is inside                               |
//! | `AtRisk`         | an Incubating agent is inside, a resident is contagious   |
//! |                  | anywhere, or the building was contaminated recently       |
//! | `Healthy`        | none of the above                                         |
//!
//! The worst matching row wins.  A building counts as contaminated while
//! it holds an Infected or Deceased occupant; the mark lingers for
//! `contamination_linger_hours` after they are gone.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use pt_agent::{AgentRegistry, HealthState};
use pt_core::BuildingId;
use pt_spatial::StaticLayer;

/// Ordered by severity: `Healthy < AtRisk < Infected < DeceasedPresent`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildingStatus {
    #[default]
    Healthy,
    AtRisk,
    Infected,
    DeceasedPresent,
}

impl BuildingStatus {
    /// `true` for anything worse than Healthy.
    pub fn is_at_risk(self) -> bool {
        self != BuildingStatus::Healthy
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BuildingInfectionState {
    pub building:  BuildingId,
    pub status:    BuildingStatus,
    pub occupants: usize,
    /// Last time an Infected or Deceased occupant was seen inside.
    pub contaminated_at: Option<f64>,
    pub updated_at:      f64,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BuildingStatusChange {
    pub building: BuildingId,
    pub from:     BuildingStatus,
    pub to:       BuildingStatus,
}

#[derive(Default)]
struct Tally {
    occupants:  usize,
    incubating: bool,
    infected:   bool,
    deceased:   bool,
    /// A resident is contagious, wherever they are.
    household_contagious: bool,
}

// ── BuildingAggregator ────────────────────────────────────────────────────────

/// Per-tile building states, recomputed after every scheduler pass.
#[derive(Clone, Debug, Default)]
pub struct BuildingAggregator {
    states:      BTreeMap<BuildingId, BuildingInfectionState>,
    computed_at: Option<f64>,
}

impl BuildingAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, building: BuildingId) -> Option<&BuildingInfectionState> {
        self.states.get(&building)
    }

    pub fn status(&self, building: BuildingId) -> BuildingStatus {
        self.states.get(&building).map_or(BuildingStatus::Healthy, |s| s.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingInfectionState> {
        self.states.values()
    }

    pub fn computed_at(&self) -> Option<f64> {
        self.computed_at
    }

    /// `true` if never computed or last computed more than `max_age` ago.
    pub fn is_stale(&self, now: f64, max_age: f64) -> bool {
        self.computed_at.is_none_or(|t| now - t > max_age)
    }

    /// Drop every state; the next recompute starts from scratch.
    pub fn discard(&mut self) {
        self.states.clear();
        self.computed_at = None;
    }

    /// Recompute every building on `layer` from the registry.
    ///
    /// Occupants and residents whose building is not on the layer are
    /// ignored.  Status changes are appended to `changes`.
    pub fn recompute(
        &mut self,
        registry: &AgentRegistry,
        layer:    &StaticLayer,
        now:      f64,
        linger:   f64,
        changes:  &mut Vec<BuildingStatusChange>,
    ) {
        let mut tallies: FxHashMap<BuildingId, Tally> = FxHashMap::default();
        for record in registry.iter() {
            if let Some(inside) = record.occupied_building() {
                let t = tallies.entry(inside).or_default();
                t.occupants += 1;
                match record.health {
                    HealthState::Incubating => t.incubating = true,
                    HealthState::Infected   => t.infected = true,
                    HealthState::Deceased   => t.deceased = true,
                    HealthState::Healthy    => {}
                }
            }
            if let Some(home) = record.home {
                if record.health.is_contagious() {
                    tallies.entry(home).or_default().household_contagious = true;
                }
            }
        }

        for building in layer.buildings() {
            let id = building.id;
            let tally = tallies.remove(&id).unwrap_or_default();
            let previous = self.states.get(&id).copied();

            let mut contaminated_at = previous.and_then(|s| s.contaminated_at);
            if tally.infected || tally.deceased {
                contaminated_at = Some(now);
            }
            let lingering = contaminated_at.is_some_and(|t| now - t <= linger);

            let status = if tally.deceased {
                BuildingStatus::DeceasedPresent
            } else if tally.infected {
                BuildingStatus::Infected
            } else if tally.incubating || tally.household_contagious || lingering {
                BuildingStatus::AtRisk
            } else {
                BuildingStatus::Healthy
            };

            let from = previous.map_or(BuildingStatus::Healthy, |s| s.status);
            if from != status {
                debug!(building = %id, ?from, to = ?status, "building status changed");
                changes.push(BuildingStatusChange { building: id, from, to: status });
            }

            self.states.insert(id, BuildingInfectionState {
                building: id,
                status,
                occupants: tally.occupants,
                contaminated_at,
                updated_at: now,
            });
        }
        self.computed_at = Some(now);
    }
}
