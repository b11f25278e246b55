//! Per-frame steering.
//!
//! # Step outline
//!
//! 1. Quarantined Infected agents and corpses do not move at all.
//! 2. A door target within `door_radius` moves the agent inside.
//! 3. Retarget on timer expiry, arrival, or a pending stuck escape.
//! 4. Heading = seek direction + inverse-square separation from agents
//!    within `separation_radius`, normalized.
//! 5. Speed = base × health × panic × night.
//! 6. If the step is blocked, probe ±30°, ±60°, ±120°; if every probe is
//!    blocked, escape to the nearest door immediately.
//! 7. Count near-zero displacement frames; too many marks the agent stuck.

use std::f32::consts::FRAC_PI_3;

use pt_agent::{AgentRecord, HealthState};
use pt_core::Vec2;

use crate::target::choose_target;
use crate::visit::{DoorEvent, enter_building};
use crate::MoveContext;

/// Rotations tried, in order, when the intended step is blocked.
const PROBE_ANGLES_DEG: [f32; 6] = [30.0, -30.0, 60.0, -60.0, 120.0, -120.0];

const INFECTED_SPEED: f32 = 0.6;
const ERRATIC_CHANCE: f64 = 0.08;
const NEAR_STOP_CHANCE: f64 = 0.03;
const NEAR_STOP_SPEED: f32 = 0.1;
const NIGHT_SPEED: f32 = 0.8;

/// Squared displacement below which a frame counts as standing still.
const STILL_EPSILON_SQ: f32 = 1e-8;

/// Advance one outdoor agent by `dt_secs` sim-seconds.
///
/// Returns a door event when the agent walked into a building this frame.
pub fn step_agent(
    record:  &mut AgentRecord,
    ctx:     &MoveContext<'_>,
    dt_secs: f32,
) -> Option<DoorEvent> {
    if !record.is_outdoor() || !record.health.is_alive() || !(dt_secs > 0.0) {
        return None;
    }
    if ctx.settings.quarantine && record.health == HealthState::Infected {
        return None;
    }

    let cfg = ctx.config;
    record.motion.retarget_in -= dt_secs;

    let target = match record.motion.target {
        Some(t) => {
            let d2 = record.position.distance_squared(t.point);
            if let Some(building) = t.building {
                if d2 <= cfg.door_radius * cfg.door_radius {
                    return Some(enter_building(record, building, ctx.now));
                }
            }
            let arrived = d2 <= cfg.arrival_radius * cfg.arrival_radius;
            if arrived || record.motion.stuck || record.motion.retarget_in <= 0.0 {
                choose_target(record, ctx)
            } else {
                t
            }
        }
        None => choose_target(record, ctx),
    };

    let seek = (target.point - record.position).normalize_or_zero();
    let mut heading = (seek + separation(record, ctx)).normalize_or_zero();
    let mut speed = cfg.walk_speed;

    if record.health == HealthState::Infected {
        speed *= INFECTED_SPEED;
        if record.rng.gen_bool(ERRATIC_CHANCE) {
            heading = heading.rotated(record.rng.gen_range(-FRAC_PI_3..FRAC_PI_3));
        }
        if record.rng.gen_bool(NEAR_STOP_CHANCE) {
            speed *= NEAR_STOP_SPEED;
        }
    }
    speed *= panic_factor(record.panic);
    if ctx.is_night() {
        speed *= NIGHT_SPEED;
    }

    let start = record.position;
    let len = speed * dt_secs;
    if heading != Vec2::ZERO && len > 0.0 {
        match probe(ctx, start, heading, len) {
            Some((next, direct)) => {
                if !direct {
                    record.motion.blocked_heading = Some(heading);
                }
                record.position = next;
            }
            None => {
                record.motion.blocked_heading = Some(heading);
                record.motion.stuck = true;
                choose_target(record, ctx);
                return None;
            }
        }
    }

    if record.position.distance_squared(start) < STILL_EPSILON_SQ {
        record.motion.still_frames += 1;
        if record.motion.still_frames >= cfg.stuck_frames {
            record.motion.stuck = true;
        }
    } else {
        record.motion.still_frames = 0;
    }
    None
}

/// Speed multiplier from panic.
#[inline]
pub fn panic_factor(panic: f32) -> f32 {
    if panic > 70.0 {
        1.35
    } else if panic > 40.0 {
        1.15
    } else {
        1.0
    }
}

/// Sum of inverse-square pushes away from nearby agents.
fn separation(record: &AgentRecord, ctx: &MoveContext<'_>) -> Vec2 {
    let me = record.id;
    let pos = record.position;
    let mut push = Vec2::ZERO;
    ctx.agents.for_each_within(pos, ctx.config.separation_radius, |n| {
        if n.id == me {
            return;
        }
        let away = pos - n.position;
        let d2 = away.length_squared();
        if d2 > 1e-6 {
            push += away.normalize_or_zero() * (1.0 / d2);
        }
    });
    push
}

/// First unobstructed step of length `len`, trying `heading` and then its
/// rotations.  The flag is `true` when the unrotated heading was free.
fn probe(ctx: &MoveContext<'_>, from: Vec2, heading: Vec2, len: f32) -> Option<(Vec2, bool)> {
    let radius = ctx.config.agent_radius;
    let direct = from + heading * len;
    if !ctx.layer.is_blocked(direct, radius) {
        return Some((direct, true));
    }
    PROBE_ANGLES_DEG
        .iter()
        .map(|deg| from + heading.rotated(deg.to_radians()) * len)
        .find(|p| !ctx.layer.is_blocked(*p, radius))
        .map(|p| (p, false))
}
