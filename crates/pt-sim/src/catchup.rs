//! Offscreen catch-up.
//!
//! Records that are not stepped every frame (everyone on an inactive tile,
//! and interior agents on the active one) are advanced in lumps instead:
//!
//! ```text
//! elapsed = now − last_update_at
//! if Interior ∧ Healthy ∧ household at risk:
//!     roll 1 − e^(−hazard × rate × elapsed)
//!     on success, onset ~ truncated exponential inside the window
//! progress durations up to now
//! last_update_at = now
//! ```
//!
//! Because both the exposure roll and the progression compose exactly,
//! advancing a record in many small lumps or one large one gives the same
//! distribution of outcomes.

use pt_agent::{AgentRecord, HealthState, Location};
use pt_contagion::{HealthTransition, infect, lump_exposure_probability, progress, sample_onset_offset};
use pt_core::{AgentId, EngineConfig};
use pt_movement::{DoorEvent, try_exit};

use crate::TileSession;

/// Bring one record up to `now`.  Returns `false` if it was already current.
///
/// `infection_rate` is the effective (hygiene-adjusted) rate.
pub fn catch_up_record(
    record:            &mut AgentRecord,
    now:               f64,
    household_at_risk: bool,
    config:            &EngineConfig,
    infection_rate:    f64,
    out:               &mut Vec<HealthTransition>,
) -> bool {
    let start = record.last_update_at;
    let elapsed = now - start;
    if !(elapsed > 0.0) {
        return false;
    }

    if household_at_risk
        && record.location == Location::Interior
        && record.health == HealthState::Healthy
    {
        let hazard = config.household_hazard_per_hour;
        let p = lump_exposure_probability(hazard, infection_rate, elapsed);
        if record.rng.gen_bool(p) {
            let offset = sample_onset_offset(record.rng.random(), hazard, infection_rate, elapsed);
            out.extend(infect(record, start + offset));
        }
    }

    progress(record, now, config, out);
    record.last_update_at = now;
    true
}

/// Catch up every record of `session` that is at least `min_elapsed` hours
/// behind, then let finished visitors out.  Returns the number of records
/// advanced.
pub fn catch_up_tile(
    session:        &mut TileSession,
    now:            f64,
    min_elapsed:    f64,
    config:         &EngineConfig,
    infection_rate: f64,
    transitions:    &mut Vec<HealthTransition>,
    doors:          &mut Vec<(AgentId, DoorEvent)>,
) -> usize {
    let TileSession { registry, layer, buildings, .. } = session;
    let mut advanced = 0;

    for record in registry.iter_mut() {
        if now - record.last_update_at < min_elapsed {
            continue;
        }
        let at_risk = record
            .occupied_building()
            .is_some_and(|b| buildings.status(b).is_at_risk());
        if catch_up_record(record, now, at_risk, config, infection_rate, transitions) {
            advanced += 1;
        }
        if let Some(event) = try_exit(record, layer, config.agent_radius, now) {
            doors.push((record.id, event));
        }
    }
    advanced
}
