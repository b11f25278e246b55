//! The per-tile static layer: collision grid, entrances, and valid-point
//! search.
//!
//! # Layout
//!
//! - **Blocker grid** — every building rectangle and obstacle circle is
//!   registered in each grid cell its bounding box overlaps, so a collision
//!   test only inspects the few blockers near the probe point.
//! - **Entrance R-tree** — door points indexed with `rstar` for
//!   nearest-shelter queries (stuck escape, panic shelter).
//!
//! Built once on first visit to a tile and never mutated afterwards.

use std::f32::consts::TAU;

use rand::Rng;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use pt_core::{BuildingId, Vec2};

use crate::geometry::{Bounds, BuildingFootprint, BuildingKind, Obstacle, TileGeometry};

/// Samples per ring for the bounded valid-point search.
const RING_SAMPLES: [usize; 4] = [8, 12, 16, 16];
/// Radial spacing between rings.
const RING_STEP: f32 = 1.0;
/// Randomized exit candidates tried around a door.
const EXIT_CANDIDATES: usize = 8;

// ── R-tree entrance entry ─────────────────────────────────────────────────────

#[derive(Clone)]
struct EntranceEntry {
    point:    [f32; 2],
    building: BuildingId,
}

impl RTreeObject for EntranceEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EntranceEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy)]
enum Blocker {
    Building(u32),
    Obstacle(u32),
}

// ── StaticLayer ───────────────────────────────────────────────────────────────

/// Immutable collision and entrance index for one tile.
pub struct StaticLayer {
    bounds:    Bounds,
    buildings: Vec<BuildingFootprint>,
    obstacles: Vec<Obstacle>,
    cell_size: f32,
    grid:      FxHashMap<(i32, i32), Vec<Blocker>>,
    doors:     RTree<EntranceEntry>,
}

impl StaticLayer {
    /// Index `geometry` with the given grid cell size.
    pub fn build(geometry: TileGeometry, cell_size: f32) -> Self {
        let cell_size = cell_size.max(0.5);
        let TileGeometry { bounds, buildings, obstacles } = geometry;

        let mut grid: FxHashMap<(i32, i32), Vec<Blocker>> = FxHashMap::default();
        let mut register = |min: Vec2, max: Vec2, blocker: Blocker| {
            let (x0, y0) = cell_of(min, cell_size);
            let (x1, y1) = cell_of(max, cell_size);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    grid.entry((cx, cy)).or_default().push(blocker);
                }
            }
        };
        for (i, b) in buildings.iter().enumerate() {
            let half = b.half_extent();
            register(b.center - half, b.center + half, Blocker::Building(i as u32));
        }
        for (i, o) in obstacles.iter().enumerate() {
            let r = Vec2::new(o.radius, o.radius);
            register(o.center - r, o.center + r, Blocker::Obstacle(i as u32));
        }

        let doors = RTree::bulk_load(
            buildings
                .iter()
                .map(|b| EntranceEntry { point: b.door().as_array(), building: b.id })
                .collect(),
        );

        Self { bounds, buildings, obstacles, cell_size, grid, doors }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn buildings(&self) -> &[BuildingFootprint] {
        &self.buildings
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Footprint by id.  Linear in building count; tiles hold tens of
    /// buildings.
    pub fn building(&self, id: BuildingId) -> Option<&BuildingFootprint> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Door point of `id`, if the building exists on this tile.
    pub fn entrance(&self, id: BuildingId) -> Option<Vec2> {
        self.building(id).map(BuildingFootprint::door)
    }

    /// Nearest door to `p` and its building.
    pub fn nearest_entrance(&self, p: Vec2) -> Option<(BuildingId, Vec2)> {
        self.doors
            .nearest_neighbor(&p.as_array())
            .map(|e| (e.building, Vec2::new(e.point[0], e.point[1])))
    }

    /// Buildings whose kind is in `kinds`.
    pub fn buildings_of_kind<'a>(
        &'a self,
        kinds: &'a [BuildingKind],
    ) -> impl Iterator<Item = &'a BuildingFootprint> + 'a {
        self.buildings.iter().filter(move |b| kinds.contains(&b.kind))
    }

    // ── Collision ─────────────────────────────────────────────────────────

    /// `true` if a disc of `radius` at `p` leaves the bounds or overlaps any
    /// building or obstacle.
    pub fn is_blocked(&self, p: Vec2, radius: f32) -> bool {
        if !self.bounds.contains_disc(p, radius) {
            return true;
        }
        let r = Vec2::new(radius, radius);
        let (x0, y0) = cell_of(p - r, self.cell_size);
        let (x1, y1) = cell_of(p + r, self.cell_size);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let Some(blockers) = self.grid.get(&(cx, cy)) else {
                    continue;
                };
                let hit = blockers.iter().any(|b| match *b {
                    Blocker::Building(i) => self.buildings[i as usize].overlaps_disc(p, radius),
                    Blocker::Obstacle(i) => self.obstacles[i as usize].overlaps_disc(p, radius),
                });
                if hit {
                    return true;
                }
            }
        }
        false
    }

    // ── Valid-point search ────────────────────────────────────────────────

    /// Bounded ring search for an unobstructed point around `anchor`.
    ///
    /// Tries `anchor` itself, then up to four rings of 8/12/16/16 jittered
    /// samples.  Falls back to the unvalidated `anchor` when every sample is
    /// blocked.
    pub fn find_open_point(&self, anchor: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
        if !self.is_blocked(anchor, radius) {
            return anchor;
        }
        for (ring, &samples) in RING_SAMPLES.iter().enumerate() {
            let dist = RING_STEP * (ring + 1) as f32;
            let phase: f32 = rng.gen_range(0.0..TAU);
            for i in 0..samples {
                let angle = phase + TAU * i as f32 / samples as f32;
                let candidate = anchor + Vec2::from_angle(angle) * dist;
                if !self.is_blocked(candidate, radius) {
                    return candidate;
                }
            }
        }
        anchor
    }

    /// Randomized re-emergence point near a door.
    ///
    /// Up to eight candidates at 1–2.5 units in random directions; the door
    /// itself is the fallback.
    pub fn exit_point(&self, door: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
        for _ in 0..EXIT_CANDIDATES {
            let angle: f32 = rng.gen_range(0.0..TAU);
            let dist: f32 = rng.gen_range(1.0..2.5);
            let candidate = door + Vec2::from_angle(angle) * dist;
            if !self.is_blocked(candidate, radius) {
                return candidate;
            }
        }
        door
    }
}

#[inline]
fn cell_of(p: Vec2, cell_size: f32) -> (i32, i32) {
    ((p.x / cell_size).floor() as i32, (p.y / cell_size).floor() as i32)
}
