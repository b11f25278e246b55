//! `WorldSessionStore`: every tile visited this process.

use rustc_hash::FxHashMap;
use tracing::info;

use pt_core::{EngineConfig, TileCoord};
use pt_spatial::WorldGeometryProvider;

use crate::TileSession;

/// Lazily populated map of tile sessions.  Nothing is ever evicted.
#[derive(Default)]
pub struct WorldSessionStore {
    tiles: FxHashMap<TileCoord, TileSession>,
}

impl WorldSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session for `coord`, creating it from `geometry` on first visit.
    pub fn get_or_create<G: WorldGeometryProvider>(
        &mut self,
        coord:    TileCoord,
        geometry: &G,
        config:   &EngineConfig,
    ) -> &mut TileSession {
        self.tiles.entry(coord).or_insert_with(|| {
            let session = TileSession::new(coord, geometry.tile_geometry(coord), config);
            info!(
                tile = %coord,
                buildings = session.layer.buildings().len(),
                obstacles = session.layer.obstacles().len(),
                "tile session created"
            );
            session
        })
    }

    pub fn get(&self, coord: TileCoord) -> Option<&TileSession> {
        self.tiles.get(&coord)
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut TileSession> {
        self.tiles.get_mut(&coord)
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Visited tile coordinates, sorted.
    pub fn coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<_> = self.tiles.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TileCoord, &mut TileSession)> {
        self.tiles.iter_mut()
    }
}
