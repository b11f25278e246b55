//! Engine tunables and per-frame settings.
//!
//! [`EngineConfig`] is fixed for the lifetime of a `Sim` and is typically
//! loaded from a JSON file by the application (with the `serde` feature).
//! [`SimSettings`] is the small set of knobs the game UI changes at runtime
//! and passes to every frame update.

use crate::{CoreError, CoreResult};

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level engine configuration.
///
/// Durations are in sim-hours, cadences in sim-seconds, distances in world
/// units.  Radii used for neighbor tests are stored squared, matching the
/// comparisons made on the hot path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Sim-hours that pass per sim-second.  Default: one hour per minute.
    pub hours_per_second: f64,

    // ── Disease progression ───────────────────────────────────────────────
    /// Time spent Incubating before becoming Infected.
    pub incubation_hours: f64,
    /// Time from infection onset (entering Incubating) to death.
    pub fatal_hours: f64,

    // ── Infection propagator ──────────────────────────────────────────────
    /// Squared contact radius for transmission.
    pub infection_radius_sq: f32,
    /// Infection check cadence.
    pub infection_check_secs: f64,
    /// Frame rate the per-frame transmission chance was tuned against.
    pub baseline_hz: f64,
    /// Per-frame transmission chance at `infection_rate = 1`, no hygiene.
    pub base_frame_chance: f64,
    /// Fraction of transmission removed at `hygiene_level = 1`.
    pub hygiene_effect: f64,

    // ── Rumor / panic propagator ──────────────────────────────────────────
    pub rumor_secs: f64,
    pub rumor_radius_sq: f32,
    pub death_witness_radius_sq: f32,
    pub infected_witness_radius_sq: f32,

    // ── Spatial hash ──────────────────────────────────────────────────────
    pub hash_cell_size: f32,
    /// Minimum spacing between dirty-triggered rebuilds.
    pub hash_soft_secs: f64,
    /// Forced rebuild interval.
    pub hash_hard_secs: f64,
    /// Squared displacement that marks the hash dirty.
    pub hash_move_epsilon_sq: f32,

    // ── Coarse cadences ───────────────────────────────────────────────────
    /// Occupancy scheduler cadence, in sim-hours.
    pub schedule_hours: f64,
    /// Minimum staleness before a record is caught up.
    pub catch_up_hours: f64,
    /// How often the catch-up sweep looks for stale records.
    pub catch_up_sweep_secs: f64,
    /// Per-hour exposure hazard inside an at-risk household.
    pub household_hazard_per_hour: f64,
    /// How long a building stays at-risk after a contagious or dead occupant.
    pub contamination_linger_hours: f64,
    /// Building states older than this are rebuilt on tile activation.
    pub building_stale_hours: f64,

    // ── Movement ──────────────────────────────────────────────────────────
    pub walk_speed: f32,
    pub arrival_radius: f32,
    pub door_radius: f32,
    pub separation_radius: f32,
    pub threat_radius: f32,
    pub agent_radius: f32,
    /// Consecutive near-zero frames before an agent counts as stuck.
    pub stuck_frames: u32,
    /// Chance that a retarget picks a building visit.
    pub visit_chance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed:                        42,
            hours_per_second:            1.0 / 60.0,
            incubation_hours:            1.0,
            fatal_hours:                 3.0,
            infection_radius_sq:         4.0,
            infection_check_secs:        1.0,
            baseline_hz:                 60.0,
            base_frame_chance:           0.05,
            hygiene_effect:              0.75,
            rumor_secs:                  0.5,
            rumor_radius_sq:             16.0,
            death_witness_radius_sq:     9.0,
            infected_witness_radius_sq:  6.0,
            hash_cell_size:              4.0,
            hash_soft_secs:              0.2,
            hash_hard_secs:              1.0,
            hash_move_epsilon_sq:        0.01,
            schedule_hours:              1.5,
            catch_up_hours:              0.25,
            catch_up_sweep_secs:         1.0,
            household_hazard_per_hour:   0.6,
            contamination_linger_hours:  6.0,
            building_stale_hours:        1.5,
            walk_speed:                  1.2,
            arrival_radius:              1.0,
            door_radius:                 1.5,
            separation_radius:           2.0,
            threat_radius:               6.0,
            agent_radius:                0.3,
            stuck_frames:                90,
            visit_chance:                0.2,
        }
    }
}

impl EngineConfig {
    /// Time an agent spends Infected before dying.
    #[inline]
    pub fn infected_hours(&self) -> f64 {
        self.fatal_hours - self.incubation_hours
    }

    /// Reject configurations that would stall or invert the simulation.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(v: f64, field: &'static str) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config { field, reason: "must be positive and finite" })
            }
        }

        positive(self.hours_per_second, "hours_per_second")?;
        positive(self.incubation_hours, "incubation_hours")?;
        positive(self.infection_check_secs, "infection_check_secs")?;
        positive(self.baseline_hz, "baseline_hz")?;
        positive(self.rumor_secs, "rumor_secs")?;
        positive(self.hash_cell_size as f64, "hash_cell_size")?;
        positive(self.hash_soft_secs, "hash_soft_secs")?;
        positive(self.hash_hard_secs, "hash_hard_secs")?;
        positive(self.schedule_hours, "schedule_hours")?;
        positive(self.catch_up_hours, "catch_up_hours")?;
        positive(self.catch_up_sweep_secs, "catch_up_sweep_secs")?;
        positive(self.infection_radius_sq as f64, "infection_radius_sq")?;
        positive(self.rumor_radius_sq as f64, "rumor_radius_sq")?;
        positive(self.walk_speed as f64, "walk_speed")?;

        if self.fatal_hours <= self.incubation_hours {
            return Err(CoreError::Config {
                field:  "fatal_hours",
                reason: "must exceed incubation_hours",
            });
        }
        if !(0.0..1.0).contains(&self.base_frame_chance) {
            return Err(CoreError::Config {
                field:  "base_frame_chance",
                reason: "must lie in [0, 1)",
            });
        }
        if !(0.0..=1.0).contains(&self.hygiene_effect) {
            return Err(CoreError::Config {
                field:  "hygiene_effect",
                reason: "must lie in [0, 1]",
            });
        }
        if self.hash_hard_secs < self.hash_soft_secs {
            return Err(CoreError::Config {
                field:  "hash_hard_secs",
                reason: "must be at least hash_soft_secs",
            });
        }
        Ok(())
    }
}

// ── SimSettings ───────────────────────────────────────────────────────────────

/// Runtime inputs supplied by the game each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimSettings {
    /// Transmission multiplier in `[0, 1]`.
    pub infection_rate: f64,
    /// Town hygiene in `[0, 1]`; reduces transmission.
    pub hygiene_level: f64,
    /// Freezes movement of Infected agents.
    pub quarantine: bool,
    /// Sim-seconds per wall-second; `<= 0` pauses the engine.
    pub simulation_speed: f64,
    /// Hour of day in `[0, 24)`; values outside wrap.
    pub time_of_day: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            infection_rate:   0.5,
            hygiene_level:    0.0,
            quarantine:       false,
            simulation_speed: 1.0,
            time_of_day:      8.0,
        }
    }
}

impl SimSettings {
    #[inline]
    pub fn is_paused(&self) -> bool {
        !(self.simulation_speed > 0.0)
    }

    /// Infection rate after the hygiene modifier, clamped to `[0, 1]`.
    pub fn effective_infection_rate(&self, hygiene_effect: f64) -> f64 {
        let rate = self.infection_rate.clamp(0.0, 1.0);
        let hygiene = self.hygiene_level.clamp(0.0, 1.0);
        rate * (1.0 - hygiene * hygiene_effect)
    }

    /// Hour of day wrapped into `[0, 24)`.
    #[inline]
    pub fn hour(&self) -> f64 {
        crate::wrap_hour(self.time_of_day)
    }
}
