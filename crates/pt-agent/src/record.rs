//! The per-NPC record and its enums.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use pt_core::{AgentId, AgentRng, BuildingId, Vec2};

use crate::{AgentSnapshot, MotionState};

/// Upper bound of the awareness and panic scales.
pub const MORALE_MAX: f32 = 100.0;

// ── HealthState ───────────────────────────────────────────────────────────────

/// Disease progression.  `Deceased` is terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthState {
    #[default]
    Healthy,
    Incubating,
    Infected,
    Deceased,
}

impl HealthState {
    /// Incubating and Infected agents transmit.
    #[inline]
    pub fn is_contagious(self) -> bool {
        matches!(self, HealthState::Incubating | HealthState::Infected)
    }

    #[inline]
    pub fn is_alive(self) -> bool {
        self != HealthState::Deceased
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthState::Healthy    => "healthy",
            HealthState::Incubating => "incubating",
            HealthState::Infected   => "infected",
            HealthState::Deceased   => "deceased",
        };
        f.write_str(s)
    }
}

/// Whether the agent is in the rendered outdoor world or hidden in a building.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    #[default]
    Outdoor,
    Interior,
}

// ── Roles and classes ─────────────────────────────────────────────────────────

/// Profession.  Drives the daily schedule and which buildings are visited.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Clergy,
    Merchant,
    Guard,
    Artisan,
    #[default]
    Laborer,
    Homemaker,
    /// Lives at the church; never scheduled home.
    Worshipper,
}

/// Social standing.  Scales how strongly rumors turn into panic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SocialClass {
    Nobility,
    Clergy,
    Merchant,
    #[default]
    Commoner,
    Peasant,
}

impl SocialClass {
    /// Multiplier applied to every panic delta.
    pub fn susceptibility(self) -> f32 {
        match self {
            SocialClass::Nobility => 0.5,
            SocialClass::Clergy   => 0.7,
            SocialClass::Merchant => 0.85,
            SocialClass::Commoner => 1.0,
            SocialClass::Peasant  => 1.2,
        }
    }
}

// ── Plague metadata ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlagueVariant {
    Bubonic,
    Pneumonic,
    Septicemic,
}

impl PlagueVariant {
    pub const ALL: [PlagueVariant; 3] =
        [PlagueVariant::Bubonic, PlagueVariant::Pneumonic, PlagueVariant::Septicemic];
}

/// Presentation-facing disease details, reset whenever the agent enters a
/// contagious state.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlagueInfo {
    /// Sim-hours timestamp the current stage began.
    pub onset_at: f64,
    pub variant:  PlagueVariant,
}

// ── Payload ───────────────────────────────────────────────────────────────────

/// Opaque presentation data (demographics, appearance) attached to an agent.
///
/// The engine never inspects it; it is forwarded to observers unchanged.
/// Cloning is a reference-count bump.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Payload(Some(Arc::new(value)))
    }

    pub fn none() -> Self {
        Payload(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the payload as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Payload(..)"),
            None    => f.write_str("Payload(none)"),
        }
    }
}

// ── AgentRecord ───────────────────────────────────────────────────────────────

/// Authoritative state of one NPC.
///
/// Times are sim-hours.  `state_entered_at` is the sole input to
/// duration-based progression and moves on every health transition.
#[derive(Clone, Debug)]
pub struct AgentRecord {
    pub id:               AgentId,
    pub health:           HealthState,
    pub state_entered_at: f64,
    pub last_update_at:   f64,

    pub position:  Vec2,
    pub elevation: f32,
    pub location:  Location,
    /// Lookup-only back reference; the building may not exist on this tile.
    pub home:      Option<BuildingId>,

    pub schedule_seed: u64,
    pub role:          Role,
    pub social_class:  SocialClass,

    /// `[0, 100]`; sticky knowledge of the outbreak.
    pub awareness: f32,
    /// `[0, 100]`; transient fear.
    pub panic:     f32,

    pub plague:           Option<PlagueInfo>,
    /// Corpses this agent has already reacted to.
    pub witnessed_deaths: FxHashSet<AgentId>,
    /// Timestamp of the newest player event this agent consumed.
    pub last_event_at:    f64,

    pub motion:  MotionState,
    pub rng:     AgentRng,
    pub payload: Payload,
}

impl AgentRecord {
    /// Apply morale deltas and clamp both scales to `[0, MORALE_MAX]`.
    pub fn adjust_morale(&mut self, awareness: f32, panic: f32) {
        self.awareness = clamp_morale(self.awareness + awareness);
        self.panic = clamp_morale(self.panic + panic);
    }

    /// Hours spent in the current health state.
    #[inline]
    pub fn time_in_state(&self, now: f64) -> f64 {
        now - self.state_entered_at
    }

    #[inline]
    pub fn is_outdoor(&self) -> bool {
        self.location == Location::Outdoor
    }

    /// The building this agent is inside, if any.
    ///
    /// A visit takes precedence over home; an Interior agent with neither
    /// is treated as occupying nothing.
    pub fn occupied_building(&self) -> Option<BuildingId> {
        match self.location {
            Location::Outdoor  => None,
            Location::Interior => self.motion.visiting.or(self.home),
        }
    }

    /// Read-only projection for the spatial hash.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id:        self.id,
            position:  self.position,
            health:    self.health,
            awareness: self.awareness,
            panic:     self.panic,
        }
    }
}

#[inline]
fn clamp_morale(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, MORALE_MAX) }
}
