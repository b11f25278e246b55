//! `pt-agent` — authoritative NPC state for the `plaguetide` engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`record`]    | `AgentRecord`, `HealthState`, `Location`, roles, `Payload`   |
//! | [`motion`]    | `MotionState` — transient steering state carried per agent   |
//! | [`snapshot`]  | `AgentSnapshot` — read-only projection for the spatial hash  |
//! | [`registry`]  | `AgentRegistry` — per-tile `AgentId → AgentRecord` map       |
//! | [`builder`]   | `AgentBuilder` (fluent record construction)                  |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                               |
//!
//! # Ownership
//!
//! A record is owned by exactly one tile's registry.  Everything else
//! (spatial hash, building aggregator, observers) works from snapshots or
//! borrowed views and never holds a record across frames.

pub mod builder;
pub mod error;
pub mod motion;
pub mod record;
pub mod registry;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::AgentBuilder;
pub use error::{AgentError, AgentResult};
pub use motion::{MotionState, Target};
pub use record::{
    AgentRecord, HealthState, Location, MORALE_MAX, Payload, PlagueInfo, PlagueVariant, Role,
    SocialClass,
};
pub use registry::{AgentRegistry, HealthCounts};
pub use snapshot::AgentSnapshot;
