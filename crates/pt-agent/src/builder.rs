//! Fluent builder for [`AgentRecord`].
//!
//! # Usage
//!
//! ```rust
//! use pt_agent::{AgentBuilder, HealthState, Role, SocialClass};
//! use pt_core::{AgentId, BuildingId, Vec2};
//!
//! let record = AgentBuilder::new(AgentId(3))
//!     .position(Vec2::new(4.0, -2.0))
//!     .home(BuildingId(1))
//!     .role(Role::Merchant)
//!     .social_class(SocialClass::Merchant)
//!     .build(/*stream_seed=*/ 42, /*now=*/ 0.0);
//!
//! assert_eq!(record.health, HealthState::Healthy);
//! assert_eq!(record.last_update_at, 0.0);
//! ```

use rustc_hash::FxHashSet;

use pt_core::{AgentId, AgentRng, BuildingId, Vec2};

use crate::{
    AgentRecord, HealthState, Location, MORALE_MAX, MotionState, Payload, PlagueInfo,
    PlagueVariant, Role, SocialClass,
};

/// Fluent builder for [`AgentRecord`].
///
/// Every field has a neutral default: a healthy, calm, homeless laborer
/// standing outdoors at the origin.
#[derive(Debug)]
pub struct AgentBuilder {
    id:            AgentId,
    health:        HealthState,
    position:      Vec2,
    elevation:     f32,
    location:      Location,
    home:          Option<BuildingId>,
    schedule_seed: Option<u64>,
    role:          Role,
    social_class:  SocialClass,
    awareness:     f32,
    panic:         f32,
    payload:       Payload,
}

impl AgentBuilder {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            health:        HealthState::Healthy,
            position:      Vec2::ZERO,
            elevation:     0.0,
            location:      Location::Outdoor,
            home:          None,
            schedule_seed: None,
            role:          Role::default(),
            social_class:  SocialClass::default(),
            awareness:     0.0,
            panic:         0.0,
            payload:       Payload::none(),
        }
    }

    pub fn health(mut self, health: HealthState) -> Self {
        self.health = health;
        self
    }

    pub fn position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn home(mut self, home: BuildingId) -> Self {
        self.home = Some(home);
        self
    }

    /// Defaults to the agent id when not set.
    pub fn schedule_seed(mut self, seed: u64) -> Self {
        self.schedule_seed = Some(seed);
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn social_class(mut self, class: SocialClass) -> Self {
        self.social_class = class;
        self
    }

    pub fn morale(mut self, awareness: f32, panic: f32) -> Self {
        self.awareness = awareness;
        self.panic = panic;
        self
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Construct the record.  Health state and update watermark both start
    /// at `now`; a contagious starting state gets plague metadata.
    pub fn build(self, stream_seed: u64, now: f64) -> AgentRecord {
        let mut rng = AgentRng::new(stream_seed, self.id);
        let plague = if self.health.is_contagious() {
            let variant = *rng.choose(&PlagueVariant::ALL).unwrap_or(&PlagueVariant::Bubonic);
            Some(PlagueInfo { onset_at: now, variant })
        } else {
            None
        };

        AgentRecord {
            id:               self.id,
            health:           self.health,
            state_entered_at: now,
            last_update_at:   now,
            position:         self.position,
            elevation:        self.elevation,
            location:         self.location,
            home:             self.home,
            schedule_seed:    self.schedule_seed.unwrap_or(self.id.as_u64()),
            role:             self.role,
            social_class:     self.social_class,
            awareness:        self.awareness.clamp(0.0, MORALE_MAX),
            panic:            self.panic.clamp(0.0, MORALE_MAX),
            plague,
            witnessed_deaths: FxHashSet::default(),
            last_event_at:    f64::NEG_INFINITY,
            motion:           MotionState::default(),
            rng,
            payload:          self.payload,
        }
    }
}
