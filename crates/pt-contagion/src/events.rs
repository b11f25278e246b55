//! Player actions that touch nearby agents.

use pt_agent::{AgentRegistry, HealthState};
use pt_core::Vec2;

use crate::lifecycle::{HealthTransition, cure};

const PANIC_EVENT_AWARENESS: f32 = 15.0;
const PANIC_EVENT_PANIC: f32 = 20.0;
const CALMING_PANIC: f32 = -20.0;
const HEAL_FROM_INCUBATING: f64 = 0.6;
const HEAL_FROM_INFECTED: f64 = 0.2;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventEffect {
    PanicInducing,
    Calming,
    Healing,
    /// Consumed like any other event but changes nothing.
    None,
}

/// A discrete, timestamped player action.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PlayerEvent {
    /// Sim-hours.  Agents ignore events no newer than the last they saw.
    pub timestamp: f64,
    pub position:  Vec2,
    pub radius:    f32,
    pub effect:    EventEffect,
}

/// Apply `event` to every living agent within its radius that has not yet
/// consumed an event this new.  Returns the number of agents affected.
pub fn apply_player_event(
    registry: &mut AgentRegistry,
    event:    &PlayerEvent,
    out:      &mut Vec<HealthTransition>,
) -> usize {
    let radius_sq = event.radius * event.radius;
    let mut affected = 0;

    for record in registry.iter_mut() {
        if !record.health.is_alive()
            || record.last_event_at >= event.timestamp
            || record.position.distance_squared(event.position) > radius_sq
        {
            continue;
        }
        record.last_event_at = event.timestamp;
        affected += 1;

        match event.effect {
            EventEffect::PanicInducing => {
                let s = record.social_class.susceptibility();
                record.adjust_morale(PANIC_EVENT_AWARENESS, PANIC_EVENT_PANIC * s);
            }
            EventEffect::Calming => record.adjust_morale(0.0, CALMING_PANIC),
            EventEffect::Healing => {
                let chance = match record.health {
                    HealthState::Incubating => HEAL_FROM_INCUBATING,
                    HealthState::Infected   => HEAL_FROM_INFECTED,
                    _ => continue,
                };
                if record.rng.gen_bool(chance) {
                    out.extend(cure(record, event.timestamp));
                }
            }
            EventEffect::None => {}
        }
    }
    affected
}
