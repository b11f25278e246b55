//! Transient steering state.
//!
//! Lives on the record so it survives the player leaving and returning, but
//! carries no simulation meaning of its own: health, morale, and scheduling
//! never read it.

use pt_core::{BuildingId, Vec2};

/// Where an agent is walking to.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Target {
    pub point:    Vec2,
    /// Set when the target is a door; reaching it moves the agent inside.
    pub building: Option<BuildingId>,
}

impl Target {
    pub fn point(point: Vec2) -> Self {
        Self { point, building: None }
    }

    pub fn door(building: BuildingId, point: Vec2) -> Self {
        Self { point, building: Some(building) }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionState {
    pub target: Option<Target>,
    /// Sim-seconds until the next forced retarget.
    pub retarget_in: f32,
    /// Consecutive frames with near-zero displacement.
    pub still_frames: u32,
    /// Next retarget must run the stuck escape rule.
    pub stuck: bool,
    /// Heading of the last fully blocked step.
    pub blocked_heading: Option<Vec2>,
    /// Building entered on a visit (not by the scheduler).
    pub visiting: Option<BuildingId>,
    /// Sim-hours timestamp at which a visiting agent re-emerges.
    pub visit_until: Option<f64>,
}

impl MotionState {
    /// Drop the steering state but keep any visit, so an agent that stops
    /// inside a building stays attributed to it.
    pub fn halt(&mut self) {
        self.target = None;
        self.retarget_in = 0.0;
        self.still_frames = 0;
        self.stuck = false;
        self.blocked_heading = None;
    }

    /// Drop any target and visit so the next frame starts fresh.
    pub fn clear(&mut self) {
        self.halt();
        self.visiting = None;
        self.visit_until = None;
    }
}
