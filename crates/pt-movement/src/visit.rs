//! Building entry and re-emergence.

use pt_agent::{AgentRecord, Location};
use pt_core::BuildingId;
use pt_spatial::StaticLayer;

const VISIT_MIN_MINUTES: f64 = 1.0;
const VISIT_MAX_MINUTES: f64 = 5.0;

/// An agent crossing a door, reported to observers.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DoorEvent {
    Entered(BuildingId),
    Exited(BuildingId),
}

/// Length of one visit, in sim-hours.
///
/// 1–5 sim-minutes, doubled for panicked agents and stretched by half for
/// well-informed ones.
pub fn visit_hours(record: &mut AgentRecord) -> f64 {
    let mut minutes = record.rng.gen_range(VISIT_MIN_MINUTES..VISIT_MAX_MINUTES);
    if record.panic > 50.0 {
        minutes *= 2.0;
    }
    if record.awareness > 60.0 {
        minutes *= 1.5;
    }
    minutes / 60.0
}

/// Move `record` inside `building` until `now + visit_hours`.
pub fn enter_building(record: &mut AgentRecord, building: BuildingId, now: f64) -> DoorEvent {
    let hours = visit_hours(record);
    record.motion.clear();
    record.location = Location::Interior;
    record.motion.visiting = Some(building);
    record.motion.visit_until = Some(now + hours);
    DoorEvent::Entered(building)
}

/// Bring a visiting agent back outside once its visit is over.
///
/// The agent reappears at one of a few randomized points near the door, or
/// on the door itself if all of them are blocked.  Agents inside only
/// because of the schedule, and the dead, stay put.
pub fn try_exit(
    record: &mut AgentRecord,
    layer:  &StaticLayer,
    radius: f32,
    now:    f64,
) -> Option<DoorEvent> {
    if record.location != Location::Interior || !record.health.is_alive() {
        return None;
    }
    let building = record.motion.visiting?;
    if record.motion.visit_until.is_some_and(|until| now < until) {
        return None;
    }

    let door = layer.entrance(building).unwrap_or(record.position);
    record.position = layer.exit_point(door, radius, record.rng.inner());
    record.location = Location::Outdoor;
    record.motion.clear();
    Some(DoorEvent::Exited(building))
}

