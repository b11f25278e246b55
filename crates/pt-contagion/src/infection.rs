//! Proximity transmission.
//!
//! # Cadence compensation
//!
//! Transmission is tuned as a per-frame chance `p_frame` at a baseline frame
//! rate.  Checks actually run on a coarser ticker, so each check stands in
//! for `baseline_hz × elapsed_secs` baseline frames:
//!
//! ```text
//! p_check = 1 − (1 − p_frame) ^ (baseline_hz × elapsed_secs)
//! ```
//!
//! The survival probability over any stretch of time is then
//! `(1 − p_frame)^(baseline_hz × total_secs)` however that stretch is cut
//! into checks, so expected time to infection does not depend on the check
//! cadence.

use pt_agent::{AgentRegistry, AgentSnapshot, HealthState};
use pt_core::{EngineConfig, SimSettings};
use pt_spatial::SpatialHash;

use crate::lifecycle::{HealthTransition, infect};

/// Transmission inputs for one check.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct InfectionParams {
    pub radius_sq:   f32,
    /// Per-baseline-frame transmission chance.
    pub p_frame:     f64,
    pub baseline_hz: f64,
}

impl InfectionParams {
    pub fn new(config: &EngineConfig, settings: &SimSettings) -> Self {
        let rate = settings.effective_infection_rate(config.hygiene_effect);
        Self {
            radius_sq:   config.infection_radius_sq,
            p_frame:     (rate * config.base_frame_chance).clamp(0.0, 1.0),
            baseline_hz: config.baseline_hz,
        }
    }

    /// Chance that one check covering `elapsed_secs` of sim time transmits.
    pub fn check_probability(&self, elapsed_secs: f64) -> f64 {
        if !(elapsed_secs > 0.0) || self.p_frame <= 0.0 {
            return 0.0;
        }
        let frames = self.baseline_hz * elapsed_secs;
        1.0 - (1.0 - self.p_frame).powf(frames)
    }
}

/// One infection check over every Healthy agent in `hash`.
///
/// An agent is exposed when at least one Incubating or Infected snapshot
/// (other than itself) lies within `radius_sq`.  Exposed agents roll once
/// with their own RNG; successes enter Incubating at `now`.
pub fn propagate_infection(
    registry:     &mut AgentRegistry,
    hash:         &SpatialHash<AgentSnapshot>,
    params:       &InfectionParams,
    elapsed_secs: f64,
    now:          f64,
    out:          &mut Vec<HealthTransition>,
) {
    let p = params.check_probability(elapsed_secs);
    if p <= 0.0 {
        return;
    }

    for snap in hash.entries() {
        if snap.health != HealthState::Healthy {
            continue;
        }
        let mut exposed = false;
        hash.for_each_within_sq(snap.position, params.radius_sq, |n| {
            exposed |= n.id != snap.id && n.health.is_contagious();
        });
        if !exposed {
            continue;
        }

        let Some(record) = registry.get_mut(snap.id) else { continue };
        // The snapshot may lag the record by a fraction of a second.
        if record.health != HealthState::Healthy || !record.is_outdoor() {
            continue;
        }
        if record.rng.gen_bool(p) {
            out.extend(infect(record, now));
        }
    }
}
