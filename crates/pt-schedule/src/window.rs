//! Daily home windows.
//!
//! Every role has a span of the day it spends at home.  Spans may wrap past
//! midnight (`start > end`).  Each agent's span is then personalised:
//!
//! ```text
//! window = role_window
//!        .stretched(+1 h if nobility)
//!        .shifted(phase_offset(schedule_seed))      // uniform in [−1.5, +1.5] h
//! ```
//!
//! The phase comes from `seeded_value`, so an agent keeps the same rhythm
//! across revisits and replays.

use pt_agent::{AgentRecord, Role, SocialClass};
use pt_core::{seeded_value, wrap_hour};

/// Largest phase shift applied to any agent, in hours.
pub const MAX_PHASE_HOURS: f64 = 1.5;
const NOBLE_STRETCH_HOURS: f64 = 1.0;
/// Offset that keys the phase stream apart from other uses of the seed.
const PHASE_STREAM: u64 = 0x5CED;

/// A half-open span `[start, end)` of hours of the day, possibly wrapping.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct HomeWindow {
    pub start: f64,
    pub end:   f64,
}

impl HomeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start: wrap_hour(start), end: wrap_hour(end) }
    }

    /// Typical hours at home for `role`.  Worshippers live at the church and
    /// have none.
    pub fn for_role(role: Role) -> Option<HomeWindow> {
        let (start, end) = match role {
            Role::Clergy     => (21.0, 5.0),
            Role::Merchant   => (20.0, 7.0),
            Role::Guard      => (8.0, 16.0),
            Role::Artisan    => (19.0, 6.0),
            Role::Laborer    => (20.0, 5.0),
            Role::Homemaker  => (14.0, 10.0),
            Role::Worshipper => return None,
        };
        Some(HomeWindow::new(start, end))
    }

    /// Extend the end of the window by `hours`.
    pub fn stretched(self, hours: f64) -> Self {
        HomeWindow::new(self.start, self.end + hours)
    }

    /// Move the whole window by `hours` (negative is earlier).
    pub fn shifted(self, hours: f64) -> Self {
        HomeWindow::new(self.start + hours, self.end + hours)
    }

    pub fn contains(&self, hour: f64) -> bool {
        let h = wrap_hour(hour);
        if self.start <= self.end {
            h >= self.start && h < self.end
        } else {
            h >= self.start || h < self.end
        }
    }
}

/// Per-agent phase shift in `[−1.5, +1.5]` hours.
pub fn phase_offset(schedule_seed: u64) -> f64 {
    (seeded_value(schedule_seed, PHASE_STREAM) * 2.0 - 1.0) * MAX_PHASE_HOURS
}

/// The personalised home window of `record`, if its role has one.
pub fn home_window(record: &AgentRecord) -> Option<HomeWindow> {
    let mut window = HomeWindow::for_role(record.role)?;
    if record.social_class == SocialClass::Nobility {
        window = window.stretched(NOBLE_STRETCH_HOURS);
    }
    Some(window.shifted(phase_offset(record.schedule_seed)))
}
