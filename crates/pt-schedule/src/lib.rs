//! `pt-schedule` — where agents spend the day, and what that means for the
//! buildings they gather in.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`window`]     | `HomeWindow` — per-role hours at home, phase offsets       |
//! | [`scheduler`]  | `run_schedule` — moves agents in and out of their homes    |
//! | [`aggregate`]  | `BuildingAggregator`, `BuildingStatus`, status changes     |
//!
//! # Cadence
//!
//! Both passes run together on the coarse schedule ticker (1.5 sim-hours by
//! default) for the active tile only: the scheduler first, then the
//! aggregator over the locations it just produced.

pub mod aggregate;
pub mod scheduler;
pub mod window;


pub use aggregate::{BuildingAggregator, BuildingInfectionState, BuildingStatus, BuildingStatusChange};
pub use scheduler::{ScheduleReport, run_schedule};
pub use window::{HomeWindow, home_window, phase_offset};
