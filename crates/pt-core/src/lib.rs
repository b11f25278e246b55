//! `pt-core` — foundational types for the `plaguetide` engine.
//!
//! This crate is a dependency of every other `pt-*` crate.  It intentionally
//! has no `pt-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `BuildingId`, `TileCoord`                  |
//! | [`geo`]         | `Vec2`, rotation and distance helpers                 |
//! | [`time`]        | `SimClock`, `Ticker`, time-of-day helpers             |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng`, `seeded_value`      |
//! | [`config`]      | `EngineConfig` (tunables), `SimSettings` (inputs)     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, SimSettings};
pub use error::{CoreError, CoreResult};
pub use geo::Vec2;
pub use ids::{AgentId, BuildingId, TileCoord};
pub use rng::{AgentRng, SimRng, seeded_value};
pub use time::{SimClock, Ticker, is_night, wrap_hour};
