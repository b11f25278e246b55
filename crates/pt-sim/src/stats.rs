//! Morale aggregates for the active tile.

use pt_agent::{AgentRegistry, HealthCounts};

/// Averages over living agents plus a census of every health state.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct MoraleStats {
    pub avg_awareness: f32,
    pub avg_panic:     f32,
    /// Living agents on the tile.
    pub agent_count:   usize,
    pub health:        HealthCounts,
}

impl MoraleStats {
    pub fn compute(registry: &AgentRegistry) -> Self {
        let mut stats = MoraleStats::default();
        let mut awareness = 0.0f64;
        let mut panic = 0.0f64;
        for record in registry.iter() {
            stats.health.record(record.health);
            if record.health.is_alive() {
                awareness += f64::from(record.awareness);
                panic += f64::from(record.panic);
                stats.agent_count += 1;
            }
        }
        if stats.agent_count > 0 {
            let n = stats.agent_count as f64;
            stats.avg_awareness = (awareness / n) as f32;
            stats.avg_panic = (panic / n) as f32;
        }
        stats
    }
}
