//! Borrowed per-agent view handed to the rendering layer.

use pt_agent::{AgentRecord, HealthState, Location, Payload, PlagueInfo};
use pt_core::{AgentId, Vec2};

#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    pub id:        AgentId,
    pub position:  Vec2,
    pub elevation: f32,
    pub location:  Location,
    pub health:    HealthState,
    pub awareness: f32,
    pub panic:     f32,
    pub plague:    Option<PlagueInfo>,
    pub payload:   &'a Payload,
}

impl<'a> From<&'a AgentRecord> for AgentView<'a> {
    fn from(r: &'a AgentRecord) -> Self {
        Self {
            id:        r.id,
            position:  r.position,
            elevation: r.elevation,
            location:  r.location,
            health:    r.health,
            awareness: r.awareness,
            panic:     r.panic,
            plague:    r.plague,
            payload:   &r.payload,
        }
    }
}
