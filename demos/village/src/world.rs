//! Synthetic village geometry.
//!
//! Every tile is a walled square with a church in the middle, a market, a
//! guardhouse, and a ring of houses.  Sizes and positions are jittered from
//! the world seed so neighboring tiles differ but a tile always looks the
//! same on revisit.

use std::f32::consts::TAU;

use pt_core::{BuildingId, TileCoord, Vec2, seeded_value};
use pt_spatial::{
    Bounds, BuildingFootprint, BuildingKind, EntranceSide, Obstacle, TileGeometry,
    WorldGeometryProvider,
};

pub const HALF_EXTENT: f32 = 40.0;
pub const HOUSES:      u32 = 8;

pub const CHURCH:     BuildingId = BuildingId(1);
pub const MARKET:     BuildingId = BuildingId(2);
pub const GUARDHOUSE: BuildingId = BuildingId(3);

/// First house id; houses are numbered consecutively from here.
pub const FIRST_HOUSE: u32 = 10;

pub struct VillageProvider {
    pub seed: u64,
}

impl VillageProvider {
    fn jitter(&self, tile: TileCoord, slot: u64, spread: f32) -> f32 {
        let v = seeded_value(self.seed ^ tile.seed_mix(), slot);
        (v as f32 * 2.0 - 1.0) * spread
    }
}

impl WorldGeometryProvider for VillageProvider {
    fn tile_geometry(&self, tile: TileCoord) -> TileGeometry {
        let building = |id, center, size, entrance, kind| BuildingFootprint {
            id,
            center,
            size,
            entrance,
            kind,
            elevation: 0.0,
        };

        let mut buildings = vec![
            building(CHURCH,     Vec2::new(0.0, 6.0),    Vec2::new(10.0, 8.0), EntranceSide::South, BuildingKind::Religious),
            building(MARKET,     Vec2::new(-18.0, -4.0), Vec2::new(8.0, 6.0),  EntranceSide::East,  BuildingKind::Commercial),
            building(GUARDHOUSE, Vec2::new(18.0, -4.0),  Vec2::new(6.0, 6.0),  EntranceSide::West,  BuildingKind::Civic),
        ];

        for i in 0..HOUSES {
            let angle = TAU * i as f32 / HOUSES as f32 + self.jitter(tile, u64::from(i), 0.1);
            let dir = Vec2::from_angle(angle);
            let center = dir * (28.0 + self.jitter(tile, 100 + u64::from(i), 2.0));
            // Doors face the village center.
            let entrance = if dir.x.abs() > dir.y.abs() {
                if dir.x > 0.0 { EntranceSide::West } else { EntranceSide::East }
            } else if dir.y > 0.0 {
                EntranceSide::South
            } else {
                EntranceSide::North
            };
            buildings.push(building(
                BuildingId(FIRST_HOUSE + i),
                center,
                Vec2::new(5.0, 4.0),
                entrance,
                BuildingKind::Residential,
            ));
        }

        let obstacles = vec![
            // Well.
            Obstacle { center: Vec2::new(0.0, -8.0), radius: 1.2 },
            Obstacle {
                center: Vec2::new(self.jitter(tile, 200, 10.0), -20.0),
                radius: 1.5,
            },
        ];

        TileGeometry { bounds: Bounds::square(HALF_EXTENT), buildings, obstacles }
    }
}
