//! Lightweight agent projection indexed by the spatial hash.

use pt_core::{AgentId, Vec2};
use pt_spatial::Positioned;

use crate::HealthState;

/// Rebuilt from the registry on every hash rebuild; never written back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AgentSnapshot {
    pub id:        AgentId,
    pub position:  Vec2,
    pub health:    HealthState,
    pub awareness: f32,
    pub panic:     f32,
}

impl Positioned for AgentSnapshot {
    #[inline]
    fn position(&self) -> Vec2 {
        self.position
    }
}
