//! Health state machine.
//!
//! ```text
//!   Healthy ──► Incubating ──► Infected ──► Deceased
//!      ▲            │              │
//!      └────────────┴── cure ──────┘
//! ```
//!
//! Forward edges out of Incubating and Infected are purely duration based:
//! the only input is `now - state_entered_at`.  The cure edge is only ever
//! taken on request.  Nothing leaves Deceased.

use pt_agent::{AgentRecord, HealthState, PlagueInfo, PlagueVariant};
use pt_core::{AgentId, EngineConfig};

/// One applied health change, reported to observers.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct HealthTransition {
    pub agent: AgentId,
    pub from:  HealthState,
    pub to:    HealthState,
    /// Sim-hours timestamp the new state began.
    pub at:    f64,
}

/// Move `record` into `to`, effective at `at`.
///
/// Returns `None` (and changes nothing) if the agent is Deceased or already
/// in `to`.  Entering a contagious state (re)initialises plague metadata;
/// returning to Healthy clears it.
pub fn transition(record: &mut AgentRecord, to: HealthState, at: f64) -> Option<HealthTransition> {
    let from = record.health;
    if from == HealthState::Deceased || from == to {
        return None;
    }

    record.health = to;
    record.state_entered_at = at;

    match to {
        HealthState::Healthy => record.plague = None,
        HealthState::Incubating | HealthState::Infected => {
            // Variant is fixed at first onset and survives Incubating → Infected.
            let variant = match record.plague {
                Some(info) if from.is_contagious() => info.variant,
                _ => *record.rng.choose(&PlagueVariant::ALL).unwrap_or(&PlagueVariant::Bubonic),
            };
            record.plague = Some(PlagueInfo { onset_at: at, variant });
        }
        HealthState::Deceased => record.motion.halt(),
    }

    Some(HealthTransition { agent: record.id, from, to, at })
}

/// Healthy → Incubating.  No-op for any other state.
pub fn infect(record: &mut AgentRecord, at: f64) -> Option<HealthTransition> {
    if record.health != HealthState::Healthy {
        return None;
    }
    transition(record, HealthState::Incubating, at)
}

/// Incubating | Infected → Healthy.  No-op for any other state.
pub fn cure(record: &mut AgentRecord, at: f64) -> Option<HealthTransition> {
    if !record.health.is_contagious() {
        return None;
    }
    transition(record, HealthState::Healthy, at)
}

/// Apply every duration-based transition due by `now`.
///
/// Each transition is stamped with its exact boundary
/// (`state_entered_at + duration`), so a single call spanning several stages
/// lands on the same timestamps as calling once per frame.
pub fn progress(
    record: &mut AgentRecord,
    now:    f64,
    config: &EngineConfig,
    out:    &mut Vec<HealthTransition>,
) {
    loop {
        let (duration, next) = match record.health {
            HealthState::Incubating => (config.incubation_hours, HealthState::Infected),
            HealthState::Infected   => (config.infected_hours(), HealthState::Deceased),
            HealthState::Healthy | HealthState::Deceased => return,
        };
        if record.time_in_state(now) < duration {
            return;
        }
        let at = record.state_entered_at + duration;
        match transition(record, next, at) {
            Some(t) => out.push(t),
            None => return,
        }
    }
}
