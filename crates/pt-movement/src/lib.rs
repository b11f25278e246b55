//! `pt-movement` — per-frame locomotion of outdoor agents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`context`]  | `MoveContext<'a>` — read-only world view for one frame       |
//! | [`target`]   | Retarget rules (stuck escape, flight, visit, unstuck, wander)|
//! | [`steer`]    | `step_agent` — seek, separation, speed, collision probe      |
//! | [`visit`]    | Door entry, visit length, re-emergence                       |
//!
//! # Frame model
//!
//! Each frame the sim calls [`step_agent`] once for every living outdoor
//! agent of the active tile and [`try_exit`] for every interior one.  All
//! reads of other agents go through the agent spatial hash, so the order in
//! which agents are stepped does not matter beyond their own RNG streams.

pub mod context;
pub mod steer;
pub mod target;
pub mod visit;


pub use context::MoveContext;
pub use steer::step_agent;
pub use target::choose_target;
pub use visit::{DoorEvent, enter_building, try_exit, visit_hours};
