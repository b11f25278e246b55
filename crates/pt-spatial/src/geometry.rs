//! Static world geometry supplied by the world-generation collaborator.
//!
//! The engine never generates geometry itself.  A [`WorldGeometryProvider`]
//! is asked once per tile (on first visit) for building footprints, obstacle
//! circles, and walkable bounds; the result is frozen into a
//! [`StaticLayer`][crate::StaticLayer].

use rand::Rng;

use pt_core::{BuildingId, TileCoord, Vec2};

/// What a building is used for.  Drives which agents visit it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildingKind {
    Residential,
    Religious,
    Commercial,
    Civic,
}

/// Which wall carries the door.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntranceSide {
    North,
    South,
    East,
    West,
}

impl EntranceSide {
    /// Outward unit normal of the entrance wall.
    pub fn normal(self) -> Vec2 {
        match self {
            EntranceSide::North => Vec2::new(0.0, 1.0),
            EntranceSide::South => Vec2::new(0.0, -1.0),
            EntranceSide::East  => Vec2::new(1.0, 0.0),
            EntranceSide::West  => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Distance from the wall to the door standing point.
const DOOR_STANDOFF: f32 = 0.6;

/// An axis-aligned rectangular building.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingFootprint {
    pub id:        BuildingId,
    pub center:    Vec2,
    /// Full width (x) and depth (y).
    pub size:      Vec2,
    pub entrance:  EntranceSide,
    pub kind:      BuildingKind,
    pub elevation: f32,
}

impl BuildingFootprint {
    pub fn half_extent(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Point just outside the entrance wall where agents enter and exit.
    pub fn door(&self) -> Vec2 {
        let n = self.entrance.normal();
        let half = self.half_extent();
        let reach = if n.x != 0.0 { half.x } else { half.y };
        self.center + n * (reach + DOOR_STANDOFF)
    }

    /// `true` if a disc of `radius` at `p` overlaps the footprint.
    pub fn overlaps_disc(&self, p: Vec2, radius: f32) -> bool {
        let half = self.half_extent();
        let dx = ((p.x - self.center.x).abs() - half.x).max(0.0);
        let dy = ((p.y - self.center.y).abs() - half.y).max(0.0);
        dx * dx + dy * dy < radius * radius || (dx == 0.0 && dy == 0.0)
    }
}

/// A round static obstacle (well, tree, cart).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn overlaps_disc(&self, p: Vec2, radius: f32) -> bool {
        let r = self.radius + radius;
        self.center.distance_squared(p) < r * r
    }
}

/// Walkable rectangle of a tile.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square bounds centered on the origin.
    pub fn square(half_extent: f32) -> Self {
        Self::new(Vec2::new(-half_extent, -half_extent), Vec2::new(half_extent, half_extent))
    }

    /// `true` if a disc of `radius` at `p` lies fully inside.
    pub fn contains_disc(&self, p: Vec2, radius: f32) -> bool {
        p.x - radius >= self.min.x
            && p.x + radius <= self.max.x
            && p.y - radius >= self.min.y
            && p.y + radius <= self.max.y
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min.x, self.max.x), p.y.clamp(self.min.y, self.max.y))
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Uniform random point inside the bounds.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        if self.max.x <= self.min.x || self.max.y <= self.min.y {
            return self.center();
        }
        Vec2::new(rng.gen_range(self.min.x..self.max.x), rng.gen_range(self.min.y..self.max.y))
    }
}

/// Everything the engine needs to know about one tile's static world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileGeometry {
    pub bounds:    Bounds,
    pub buildings: Vec<BuildingFootprint>,
    pub obstacles: Vec<Obstacle>,
}

impl TileGeometry {
    /// An empty walkable field.
    pub fn open(bounds: Bounds) -> Self {
        Self { bounds, buildings: Vec::new(), obstacles: Vec::new() }
    }
}

// ── WorldGeometryProvider ─────────────────────────────────────────────────────

/// World-generation collaborator boundary.
///
/// Called once per tile, the first time the tile is visited.  Implementations
/// must be deterministic for a given `tile` so a revisit after a process
/// restart would describe the same village.
pub trait WorldGeometryProvider {
    fn tile_geometry(&self, tile: TileCoord) -> TileGeometry;
}

/// A provider that returns the same empty square for every tile.
pub struct OpenField {
    pub half_extent: f32,
}

impl WorldGeometryProvider for OpenField {
    fn tile_geometry(&self, _tile: TileCoord) -> TileGeometry {
        TileGeometry::open(Bounds::square(self.half_extent))
    }
}
