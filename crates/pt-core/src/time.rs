//! Simulation time model.
//!
//! # Design
//!
//! Two clocks run side by side:
//!
//! - **Sim-seconds** — wall-clock frame delta scaled by `simulation_speed`.
//!   Every cadence (`Ticker`) accumulates sim-seconds, so pausing the game
//!   (`speed = 0`) freezes all of them uniformly.
//! - **Sim-hours** — the monotonic `f64` timestamp stored on agent records
//!   (`state_entered_at`, `last_update_at`).  Derived from sim-seconds via
//!   `hours_per_second`:
//!
//!   sim_hours += sim_seconds * hours_per_second
//!
//! The time of day (0–24) is owned by the rendering layer and supplied per
//! frame in `SimSettings`; it wraps and is not monotonic, so it is never used
//! for duration arithmetic.

use std::fmt;

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Monotonic simulated time in hours plus a frame counter.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated hours elapsed since the session started.
    pub sim_hours: f64,
    /// Sim-hours that pass per sim-second.
    pub hours_per_second: f64,
    /// Frames advanced so far (paused frames are not counted).
    pub frame: u64,
}

impl SimClock {
    pub fn new(hours_per_second: f64) -> Self {
        Self { sim_hours: 0.0, hours_per_second, frame: 0 }
    }

    /// Advance by `sim_secs` sim-seconds and return the sim-hours elapsed.
    #[inline]
    pub fn advance(&mut self, sim_secs: f64) -> f64 {
        let hours = sim_secs * self.hours_per_second;
        self.sim_hours += hours;
        self.frame += 1;
        hours
    }

    /// Convert a sim-hour span into sim-seconds.
    #[inline]
    pub fn hours_to_secs(&self, hours: f64) -> f64 {
        if self.hours_per_second > 0.0 { hours / self.hours_per_second } else { 0.0 }
    }

    /// Break elapsed time into (day, hour, minute) components.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_min = (self.sim_hours.max(0.0) * 60.0) as u64;
        (total_min / 1_440, ((total_min % 1_440) / 60) as u32, (total_min % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "F{} (day {} {:02}:{:02})", self.frame, d, h, m)
    }
}

// ── Ticker ────────────────────────────────────────────────────────────────────

/// Accumulator-driven cadence.
///
/// Advanced once per frame; fires when the accumulated time crosses
/// `threshold`, then resets to zero.  The accumulated amount at firing time
/// is reported so rate-based logic (infection compensation) can use the real
/// elapsed interval instead of the nominal one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticker {
    pub accumulated: f64,
    pub threshold:   f64,
}

impl Ticker {
    pub fn new(threshold: f64) -> Self {
        Self { accumulated: 0.0, threshold }
    }

    /// Advance by `dt`; `true` if the cadence fired this call.
    #[inline]
    pub fn advance(&mut self, dt: f64) -> bool {
        self.advance_elapsed(dt).is_some()
    }

    /// Advance by `dt`; on firing, return the time accumulated since the
    /// previous firing.
    pub fn advance_elapsed(&mut self, dt: f64) -> Option<f64> {
        self.accumulated += dt.max(0.0);
        if self.accumulated >= self.threshold {
            let elapsed = self.accumulated;
            self.accumulated = 0.0;
            Some(elapsed)
        } else {
            None
        }
    }

    /// Time accumulated since the last firing (or reset).
    #[inline]
    pub fn pending(&self) -> f64 {
        self.accumulated
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

// ── Time-of-day helpers ───────────────────────────────────────────────────────

/// Wrap an hour value into `[0, 24)`.
#[inline]
pub fn wrap_hour(hour: f64) -> f64 {
    hour.rem_euclid(24.0)
}

/// Night is 20:00–06:00.
#[inline]
pub fn is_night(hour: f64) -> bool {
    let h = wrap_hour(hour);
    !(6.0..20.0).contains(&h)
}
