//! Awareness and panic diffusion.
//!
//! Each tick every living outdoor agent looks at its neighbours within the
//! rumor radius:
//!
//! | Trigger                                  | awareness | panic (× susceptibility) |
//! |------------------------------------------|-----------|--------------------------|
//! | Corpse within the death-witness radius   | +30       | +25, once per corpse     |
//! | Infected within the symptom radius       | +3        | +1.5                     |
//! | Neighbour more aware by more than 10     | +Δ×0.08   | +Δ×0.04                  |
//!
//! followed by a flat decay and a clamp to `[0, 100]`.

use pt_agent::{AgentRegistry, AgentSnapshot, HealthState};
use pt_core::EngineConfig;
use pt_spatial::SpatialHash;

const CORPSE_AWARENESS: f32 = 30.0;
const CORPSE_PANIC: f32 = 25.0;
const SYMPTOM_AWARENESS: f32 = 3.0;
const SYMPTOM_PANIC: f32 = 1.5;
const DIFFUSION_GAP: f32 = 10.0;
const DIFFUSION_RATE: f32 = 0.08;
const DIFFUSION_PANIC_SHARE: f32 = 0.5;
const PANIC_DECAY: f32 = 0.08;
const AWARENESS_DECAY: f32 = 0.01;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RumorParams {
    pub radius_sq:          f32,
    pub corpse_radius_sq:   f32,
    pub symptom_radius_sq:  f32,
}

impl RumorParams {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            radius_sq:         config.rumor_radius_sq,
            corpse_radius_sq:  config.death_witness_radius_sq,
            symptom_radius_sq: config.infected_witness_radius_sq,
        }
    }
}

/// One rumor tick.
///
/// Neighbour values come from the snapshots in `hash`; each agent's own
/// awareness is read from its snapshot too, so all agents react to the same
/// pre-tick picture.
pub fn propagate_rumor(
    registry: &mut AgentRegistry,
    hash:     &SpatialHash<AgentSnapshot>,
    params:   &RumorParams,
) {
    for snap in hash.entries() {
        if !snap.health.is_alive() {
            continue;
        }
        let Some(record) = registry.get_mut(snap.id) else { continue };
        if !record.health.is_alive() {
            continue;
        }

        let susceptibility = record.social_class.susceptibility();
        let mut d_awareness = 0.0;
        let mut d_panic = 0.0;

        hash.for_each_within_sq(snap.position, params.radius_sq, |n| {
            if n.id == snap.id {
                return;
            }
            let d2 = n.position.distance_squared(snap.position);
            match n.health {
                HealthState::Deceased if d2 <= params.corpse_radius_sq => {
                    if record.witnessed_deaths.insert(n.id) {
                        d_awareness += CORPSE_AWARENESS;
                        d_panic += CORPSE_PANIC * susceptibility;
                    }
                }
                HealthState::Infected if d2 <= params.symptom_radius_sq => {
                    d_awareness += SYMPTOM_AWARENESS;
                    d_panic += SYMPTOM_PANIC * susceptibility;
                }
                _ => {}
            }
            let gap = n.awareness - snap.awareness;
            if n.health.is_alive() && gap > DIFFUSION_GAP {
                d_awareness += gap * DIFFUSION_RATE;
                d_panic += gap * DIFFUSION_RATE * DIFFUSION_PANIC_SHARE * susceptibility;
            }
        });

        record.adjust_morale(d_awareness - AWARENESS_DECAY, d_panic - PANIC_DECAY);
    }
}
