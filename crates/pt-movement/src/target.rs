//! Retarget rules.
//!
//! Evaluated in order; the first rule that yields a target wins.
//!
//! | # | Rule               | Fires when                                   | Target                        |
//! |---|--------------------|----------------------------------------------|-------------------------------|
//! | 1 | Stuck escape       | stuck flag set                               | nearest entrance              |
//! | 2 | Panic flight       | panic > 50 and a threat within 6 units       | 15–25 units away from threats |
//! |   | Panic shelter      | panic > 50, no threat, roll `panic / 100`    | nearest entrance              |
//! | 3 | Scheduled visit    | roll `visit_chance`                          | eligible building entrance    |
//! | 4 | Directional unstuck| a step was recently blocked                  | opposite heading ±45°, 6–10 u |
//! | 5 | Wander             | always                                       | random point in bounds        |

use std::f32::consts::{FRAC_PI_4, TAU};

use pt_agent::{AgentRecord, Role, Target};
use pt_core::Vec2;
use pt_spatial::BuildingKind;

use crate::MoveContext;

const PANIC_FLIGHT: f32 = 50.0;
const FLEE_MIN: f32 = 15.0;
const FLEE_MAX: f32 = 25.0;
const UNSTUCK_MIN: f32 = 6.0;
const UNSTUCK_MAX: f32 = 10.0;
const RETARGET_MIN_SECS: f32 = 8.0;
const RETARGET_MAX_SECS: f32 = 15.0;

/// Pick a new target for `record`, reset its retarget timer, and consume the
/// stuck and blocked-heading markers.
pub fn choose_target(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Target {
    let target = stuck_escape(record, ctx)
        .or_else(|| panic_flight(record, ctx))
        .or_else(|| scheduled_visit(record, ctx))
        .or_else(|| directional_unstuck(record, ctx))
        .unwrap_or_else(|| wander(record, ctx));

    let motion = &mut record.motion;
    motion.stuck = false;
    motion.still_frames = 0;
    motion.blocked_heading = None;
    motion.target = Some(target);
    motion.retarget_in = record.rng.gen_range(RETARGET_MIN_SECS..RETARGET_MAX_SECS);
    target
}

fn nearest_door(record: &AgentRecord, ctx: &MoveContext<'_>) -> Option<Target> {
    ctx.layer
        .nearest_entrance(record.position)
        .map(|(building, door)| Target::door(building, door))
}

fn stuck_escape(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Option<Target> {
    if !record.motion.stuck {
        return None;
    }
    nearest_door(record, ctx)
}

fn panic_flight(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Option<Target> {
    if record.panic <= PANIC_FLIGHT {
        return None;
    }

    let me = record.id;
    let radius = ctx.config.threat_radius;
    let mut sum = Vec2::ZERO;
    let mut threats = 0u32;
    ctx.agents.for_each_within(record.position, radius, |n| {
        if n.id != me && (n.health.is_contagious() || !n.health.is_alive()) {
            sum += n.position;
            threats += 1;
        }
    });

    if threats > 0 {
        let centroid = sum * (1.0 / threats as f32);
        let mut away = (record.position - centroid).normalize_or_zero();
        if away == Vec2::ZERO {
            away = Vec2::from_angle(record.rng.gen_range(0.0..TAU));
        }
        let dist = record.rng.gen_range(FLEE_MIN..FLEE_MAX);
        let point = ctx.layer.bounds().clamp(record.position + away * dist);
        return Some(Target::point(point));
    }

    if record.rng.gen_bool(f64::from(record.panic) / 100.0) {
        return nearest_door(record, ctx);
    }
    None
}

fn eligible_kinds(role: Role) -> &'static [BuildingKind] {
    match role {
        Role::Clergy | Role::Worshipper => &[BuildingKind::Residential, BuildingKind::Religious],
        Role::Merchant => &[BuildingKind::Residential, BuildingKind::Commercial],
        _ => &[BuildingKind::Residential],
    }
}

fn scheduled_visit(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Option<Target> {
    if !record.rng.gen_bool(ctx.config.visit_chance) {
        return None;
    }
    let candidates: Vec<_> = ctx.layer.buildings_of_kind(eligible_kinds(record.role)).collect();
    let building = record.rng.choose(&candidates)?;
    Some(Target::door(building.id, building.door()))
}

fn directional_unstuck(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Option<Target> {
    let blocked = record.motion.blocked_heading?;
    let away = (Vec2::ZERO - blocked).normalize_or_zero();
    if away == Vec2::ZERO {
        return None;
    }
    let heading = away.rotated(record.rng.gen_range(-FRAC_PI_4..FRAC_PI_4));
    let dist = record.rng.gen_range(UNSTUCK_MIN..UNSTUCK_MAX);
    Some(Target::point(ctx.layer.bounds().clamp(record.position + heading * dist)))
}

fn wander(record: &mut AgentRecord, ctx: &MoveContext<'_>) -> Target {
    Target::point(ctx.layer.bounds().random_point(record.rng.inner()))
}
