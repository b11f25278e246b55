//! `AgentRegistry`: the per-tile map from `AgentId` to `AgentRecord`.
//!
//! Backed by a `BTreeMap` so iteration is always in ascending-id order; every
//! frame phase walks agents in that order, which keeps replays of the same
//! seed identical.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use pt_core::{AgentId, BuildingId};

use crate::{AgentError, AgentRecord, AgentResult, AgentSnapshot, HealthState};

// ── HealthCounts ──────────────────────────────────────────────────────────────

/// Number of agents in each health state.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthCounts {
    pub healthy:    usize,
    pub incubating: usize,
    pub infected:   usize,
    pub deceased:   usize,
}

impl HealthCounts {
    pub fn record(&mut self, health: HealthState) {
        match health {
            HealthState::Healthy    => self.healthy += 1,
            HealthState::Incubating => self.incubating += 1,
            HealthState::Infected   => self.infected += 1,
            HealthState::Deceased   => self.deceased += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.incubating + self.infected + self.deceased
    }

    pub fn alive(&self) -> usize {
        self.total() - self.deceased
    }

    pub fn contagious(&self) -> usize {
        self.incubating + self.infected
    }
}

// ── AgentRegistry ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct AgentRegistry {
    records: BTreeMap<AgentId, AgentRecord>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record.  An id already present is rejected and the
    /// existing record is left untouched.
    pub fn insert(&mut self, record: AgentRecord) -> AgentResult<()> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(AgentError::DuplicateAgent(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Take a record out of the registry, e.g. when a body is collected.
    pub fn remove(&mut self, id: AgentId) -> Option<AgentRecord> {
        self.records.remove(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.records.get_mut(&id)
    }

    /// Like [`get_mut`](Self::get_mut) but with a typed error for API callers.
    pub fn require_mut(&mut self, id: AgentId) -> AgentResult<&mut AgentRecord> {
        self.records.get_mut(&id).ok_or(AgentError::NotFound(id))
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest id greater than every id in the registry.
    pub fn next_id(&self) -> AgentId {
        self.records
            .keys()
            .next_back()
            .map_or(AgentId(0), |id| AgentId(id.0.saturating_add(1)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentRecord> {
        self.records.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.records.keys().copied()
    }

    /// Snapshots of every outdoor agent, corpses included.
    pub fn outdoor_snapshots(&self) -> Vec<AgentSnapshot> {
        self.records
            .values()
            .filter(|r| r.is_outdoor())
            .map(AgentRecord::snapshot)
            .collect()
    }

    /// Members of the household living in `home`, wherever they are.
    pub fn household(&self, home: BuildingId) -> impl Iterator<Item = &AgentRecord> {
        self.records.values().filter(move |r| r.home == Some(home))
    }

    /// Agents currently inside `building`.
    pub fn occupants(&self, building: BuildingId) -> impl Iterator<Item = &AgentRecord> {
        self.records
            .values()
            .filter(move |r| r.occupied_building() == Some(building))
    }

    pub fn counts(&self) -> HealthCounts {
        let mut counts = HealthCounts::default();
        for r in self.records.values() {
            counts.record(r.health);
        }
        counts
    }
}
