//! `pt-contagion` — how disease and fear move through a tile's population.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`lifecycle`]   | Health state machine: `transition`, `progress`, `cure`      |
//! | [`infection`]   | Proximity transmission with cadence compensation            |
//! | [`rumor`]       | Awareness / panic diffusion, corpse and symptom witnessing  |
//! | [`events`]      | `PlayerEvent` — timestamped player actions                  |
//! | [`exposure`]    | Lump hazard math for agents that are not simulated per frame|
//!
//! # Design notes
//!
//! Every propagator reads neighbours from a `SpatialHash<AgentSnapshot>` and
//! writes only the record of the agent being updated.  Snapshots are never
//! written back, so the order in which agents are visited cannot leak one
//! agent's update of this pass into another's.
//!
//! Health transitions are appended to a caller-supplied
//! `Vec<HealthTransition>`; the frame loop forwards them to observers.

pub mod events;
pub mod exposure;
pub mod infection;
pub mod lifecycle;
pub mod rumor;


pub use events::{EventEffect, PlayerEvent, apply_player_event};
pub use exposure::{lump_exposure_probability, sample_onset_offset};
pub use infection::{InfectionParams, propagate_infection};
pub use lifecycle::{HealthTransition, cure, infect, progress, transition};
pub use rumor::{RumorParams, propagate_rumor};
