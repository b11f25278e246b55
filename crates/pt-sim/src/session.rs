//! `TileSession`: everything the engine keeps for one visited tile.

use pt_agent::{AgentBuilder, AgentRegistry, AgentSnapshot, Location};
use pt_core::{AgentId, EngineConfig, SimRng, TileCoord};
use pt_schedule::BuildingAggregator;
use pt_spatial::{SpatialHash, StaticLayer, TileGeometry};

use crate::SimResult;

/// Golden-ratio constant used to spread tile coordinates across seeds.
const TILE_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

// ── HashGate ──────────────────────────────────────────────────────────────────

/// Decides when the agent hash is rebuilt.
///
/// A dirty hash is rebuilt once `soft` sim-seconds have passed since the last
/// rebuild; a clean one is still rebuilt every `hard` sim-seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HashGate {
    soft:     f64,
    hard:     f64,
    since:    f64,
    dirty:    bool,
    rebuilds: u64,
}

impl HashGate {
    pub fn new(soft: f64, hard: f64) -> Self {
        Self { soft, hard, since: 0.0, dirty: false, rebuilds: 0 }
    }

    #[inline]
    pub fn advance(&mut self, sim_secs: f64) {
        self.since += sim_secs.max(0.0);
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_due(&self) -> bool {
        self.since >= self.hard || (self.dirty && self.since >= self.soft)
    }

    pub fn rebuilt(&mut self) {
        self.since = 0.0;
        self.dirty = false;
        self.rebuilds += 1;
    }

    /// Rebuilds performed so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

// ── TileSession ───────────────────────────────────────────────────────────────

/// One visited tile.  Created on the first visit and kept for the lifetime
/// of the process.
pub struct TileSession {
    pub coord:     TileCoord,
    pub registry:  AgentRegistry,
    pub layer:     StaticLayer,
    /// Snapshots of the outdoor agents as of the last rebuild.
    pub hash:      SpatialHash<AgentSnapshot>,
    pub gate:      HashGate,
    pub buildings: BuildingAggregator,
    /// Sim-hours of the last scheduler pass over this tile.
    pub last_schedule_time: Option<f64>,
    stream_seed: u64,
    rng:         SimRng,
}

impl TileSession {
    pub fn new(coord: TileCoord, geometry: TileGeometry, config: &EngineConfig) -> Self {
        let stream_seed = config.seed ^ coord.seed_mix().wrapping_mul(TILE_MIX);
        Self {
            coord,
            registry:  AgentRegistry::new(),
            layer:     StaticLayer::build(geometry, config.hash_cell_size),
            hash:      SpatialHash::empty(config.hash_cell_size),
            gate:      HashGate::new(config.hash_soft_secs, config.hash_hard_secs),
            buildings: BuildingAggregator::new(),
            last_schedule_time: None,
            stream_seed,
            rng: SimRng::new(stream_seed),
        }
    }

    /// Seed shared by every agent RNG on this tile.
    pub fn stream_seed(&self) -> u64 {
        self.stream_seed
    }

    pub fn next_agent_id(&self) -> AgentId {
        self.registry.next_id()
    }

    /// Build and register a new agent.
    ///
    /// Outdoor agents are moved to the nearest unobstructed point around the
    /// requested position (or left on it when the search is exhausted).
    pub fn spawn(
        &mut self,
        builder: AgentBuilder,
        now:     f64,
        config:  &EngineConfig,
    ) -> SimResult<AgentId> {
        let mut record = builder.build(self.stream_seed, now);
        if record.location == Location::Outdoor {
            record.position =
                self.layer.find_open_point(record.position, config.agent_radius, self.rng.inner());
        }
        let id = record.id;
        self.registry.insert(record)?;
        self.gate.mark_dirty();
        Ok(id)
    }

    /// Rebuild the agent hash from the registry unconditionally.
    pub fn rebuild_hash(&mut self) {
        self.hash = SpatialHash::build(self.registry.outdoor_snapshots(), self.hash.cell_size());
        self.gate.rebuilt();
    }

    /// Mark the hash dirty if any outdoor agent changed health, moved more
    /// than `epsilon_sq`, or crossed a door since the last rebuild.
    pub fn detect_changes(&mut self, epsilon_sq: f32) {
        if self.gate.is_dirty() {
            return;
        }
        let outdoor = self.registry.iter().filter(|r| r.is_outdoor()).count();
        let changed = outdoor != self.hash.len()
            || self.hash.entries().iter().any(|snap| match self.registry.get(snap.id) {
                Some(r) => {
                    !r.is_outdoor()
                        || r.health != snap.health
                        || r.position.distance_squared(snap.position) > epsilon_sq
                }
                None => true,
            });
        if changed {
            self.gate.mark_dirty();
        }
    }

    /// Advance the gate and rebuild if due.  Returns `true` on rebuild.
    pub fn maybe_rebuild_hash(&mut self, sim_secs: f64, epsilon_sq: f32) -> bool {
        self.gate.advance(sim_secs);
        self.detect_changes(epsilon_sq);
        if self.gate.is_due() {
            self.rebuild_hash();
            true
        } else {
            false
        }
    }
}
