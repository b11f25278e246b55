//! Occupancy scheduler.
//!
//! Sends agents home when their window opens and back out when it closes.
//! Skipped entirely:
//!
//! - the dead, the homeless, and worshippers;
//! - agents on a visit (movement brings them back out);
//! - agents whose home is not a building on this tile;
//! - agents inside the interior the player currently occupies, who stay
//!   inside until the player leaves.

use pt_agent::{AgentRegistry, Location, Role};
use pt_core::{AgentId, BuildingId};
use pt_movement::DoorEvent;
use pt_spatial::StaticLayer;
use tracing::debug;

use crate::window::home_window;

/// What one scheduler pass did.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct ScheduleReport {
    pub went_home: usize,
    pub went_out:  usize,
    pub pinned:    usize,
}

/// Apply the schedule for `hour` to every eligible agent.
///
/// Door crossings are appended to `doors` for the observer.
pub fn run_schedule(
    registry:     &mut AgentRegistry,
    layer:        &StaticLayer,
    hour:         f64,
    pinned:       Option<BuildingId>,
    agent_radius: f32,
    doors:        &mut Vec<(AgentId, DoorEvent)>,
) -> ScheduleReport {
    let mut report = ScheduleReport::default();

    for record in registry.iter_mut() {
        if !record.health.is_alive() || record.role == Role::Worshipper {
            continue;
        }
        if record.motion.visiting.is_some() {
            continue;
        }
        let Some(home) = record.home else { continue };
        let Some(door) = layer.entrance(home) else { continue };

        if pinned.is_some() && record.occupied_building() == pinned {
            report.pinned += 1;
            continue;
        }
        let Some(window) = home_window(record) else { continue };

        match (window.contains(hour), record.location) {
            (true, Location::Outdoor) => {
                record.motion.clear();
                record.position = door;
                record.location = Location::Interior;
                doors.push((record.id, DoorEvent::Entered(home)));
                report.went_home += 1;
            }
            (false, Location::Interior) => {
                record.motion.clear();
                record.position = layer.exit_point(door, agent_radius, record.rng.inner());
                record.location = Location::Outdoor;
                doors.push((record.id, DoorEvent::Exited(home)));
                report.went_out += 1;
            }
            _ => {}
        }
    }

    debug!(
        hour,
        went_home = report.went_home,
        went_out = report.went_out,
        pinned = report.pinned,
        "schedule pass"
    );
    report
}
