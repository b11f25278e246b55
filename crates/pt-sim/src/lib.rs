//! `pt-sim` — frame loop orchestrator for the `plaguetide` engine.
//!
//! # Frame loop
//!
//! ```text
//! update(wall_dt):
//!   sim_secs = wall_dt × simulation_speed        (paused when ≤ 0)
//!   ① Events    — queued player events mutate the active tile.
//!   ② Movement  — living outdoor agents step, then progress their
//!                 health durations; finished visitors leave buildings.
//!   ③ Hash      — agent hash rebuilt when dirty (0.2 s) or old (1 s).
//!   ④ Rumor     — every 0.5 s.
//!   ⑤ Infection — every 1 s, compensated for the real elapsed time.
//!   ⑥ Morale    — stats on every second hash rebuild.
//!   ⑦ Schedule  — every 1.5 sim-hours: catch-up, home windows,
//!                 building aggregation.
//!   ⑧ Catch-up  — every 1 s, every tile: records ≥ 0.25 h stale.
//! ```
//!
//! Inactive tiles are never stepped.  Their records are advanced in lumps by
//! [`catch_up_record`], which reproduces the distribution of outcomes the
//! frame loop would have produced for indoor agents.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`sim`]      | `Sim<G>` — the engine and its frame loop                |
//! | [`builder`]  | `SimBuilder` — validated construction                   |
//! | [`session`]  | `TileSession`, `HashGate`                               |
//! | [`store`]    | `WorldSessionStore` — every visited tile                |
//! | [`catchup`]  | Offscreen lump advancement                              |
//! | [`observer`] | `AgentObserver` callbacks, `NoopObserver`               |
//! | [`stats`]    | `MoraleStats`                                           |
//! | [`view`]     | `AgentView` — borrowed render view of one agent         |
//! | [`error`]    | `SimError`, `SimResult`                                 |
//!
//! # Cargo features
//!
//! | Feature | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Forwards `serde` to the `pt-*` crates.                      |

pub mod builder;
pub mod catchup;
pub mod error;
pub mod observer;
pub mod session;
pub mod sim;
pub mod stats;
pub mod store;
pub mod view;


pub use builder::SimBuilder;
pub use catchup::{catch_up_record, catch_up_tile};
pub use error::{SimError, SimResult};
pub use observer::{AgentObserver, NoopObserver};
pub use session::{HashGate, TileSession};
pub use sim::Sim;
pub use stats::MoraleStats;
pub use store::WorldSessionStore;
pub use view::AgentView;
