//! Closed-form exposure for agents advanced in lumps instead of per frame.
//!
//! A household at risk exposes its interior members to a constant hazard
//! `λ = hazard_per_hour × infection_rate`.  Over a window of `t` hours the
//! chance of at least one transmission is `1 − e^(−λt)`, and given that one
//! happened its time is exponentially distributed, truncated to the window.
//! Both compose exactly: cutting a window into pieces changes neither the
//! overall probability nor the onset distribution.

/// Chance of infection over `elapsed_hours` at a constant hazard.
pub fn lump_exposure_probability(hazard_per_hour: f64, infection_rate: f64, elapsed_hours: f64) -> f64 {
    let lambda = hazard_per_hour * infection_rate;
    if !(lambda > 0.0) || !(elapsed_hours > 0.0) {
        return 0.0;
    }
    1.0 - (-lambda * elapsed_hours).exp()
}

/// Hours into a window of `window_hours` at which an infection that is
/// known to have happened took place.
///
/// `u` is a uniform sample in `[0, 1)`; the result is the inverse CDF of the
/// exponential truncated to `[0, window_hours]`.  A zero hazard degenerates
/// to a uniform onset.
pub fn sample_onset_offset(u: f64, hazard_per_hour: f64, infection_rate: f64, window_hours: f64) -> f64 {
    if !(window_hours > 0.0) {
        return 0.0;
    }
    let u = u.clamp(0.0, 1.0);
    let lambda = hazard_per_hour * infection_rate;
    if !(lambda > 0.0) {
        return u * window_hours;
    }
    let mass = 1.0 - (-lambda * window_hours).exp();
    let t = -(1.0 - u * mass).ln() / lambda;
    t.clamp(0.0, window_hours)
}
