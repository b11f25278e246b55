//! Unit tests for pt-spatial.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use pt_core::{BuildingId, Vec2};

use crate::{
    Bounds, BuildingFootprint, BuildingKind, EntranceSide, Obstacle, Positioned, SpatialHash,
    StaticLayer, TileGeometry,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct Dot {
    id:  u32,
    pos: Vec2,
}

impl Positioned for Dot {
    fn position(&self) -> Vec2 {
        self.pos
    }
}

fn random_dots(rng: &mut SmallRng, n: usize, extent: f32) -> Vec<Dot> {
    (0..n as u32)
        .map(|id| Dot {
            id,
            pos: Vec2::new(rng.gen_range(-extent..extent), rng.gen_range(-extent..extent)),
        })
        .collect()
}

fn brute_force(dots: &[Dot], p: Vec2, r: f32) -> Vec<u32> {
    let mut ids: Vec<u32> = dots
        .iter()
        .filter(|d| d.pos.distance_squared(p) <= r * r)
        .map(|d| d.id)
        .collect();
    ids.sort_unstable();
    ids
}

fn house(id: u32, center: Vec2, kind: BuildingKind) -> BuildingFootprint {
    BuildingFootprint {
        id:        BuildingId(id),
        center,
        size:      Vec2::new(6.0, 4.0),
        entrance:  EntranceSide::South,
        kind,
        elevation: 0.0,
    }
}

/// 60×60 tile with two houses and a well.
fn village() -> StaticLayer {
    StaticLayer::build(
        TileGeometry {
            bounds:    Bounds::square(30.0),
            buildings: vec![
                house(1, Vec2::new(-10.0, 0.0), BuildingKind::Residential),
                house(2, Vec2::new(10.0, 10.0), BuildingKind::Religious),
            ],
            obstacles: vec![Obstacle { center: Vec2::new(0.0, -10.0), radius: 1.5 }],
        },
        4.0,
    )
}

// ── SpatialHash ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial_hash {
    use super::*;

    #[test]
    fn matches_brute_force_on_random_sets() {
        let mut rng = SmallRng::seed_from_u64(42);
        for trial in 0..50 {
            let n = rng.gen_range(0..400);
            let dots = random_dots(&mut rng, n, 40.0);
            let hash = SpatialHash::build(dots.clone(), 4.0);
            for _ in 0..20 {
                let p = Vec2::new(rng.gen_range(-45.0..45.0), rng.gen_range(-45.0..45.0));
                let r = rng.gen_range(0.0..10.0);
                let mut got: Vec<u32> = hash.query_radius(p, r).iter().map(|d| d.id).collect();
                got.sort_unstable();
                assert_eq!(got, brute_force(&dots, p, r), "trial {trial} p {p:?} r {r}");
            }
        }
    }

    #[test]
    fn for_each_within_sq_agrees_with_query_radius() {
        let mut rng = SmallRng::seed_from_u64(7);
        let dots = random_dots(&mut rng, 200, 20.0);
        let hash = SpatialHash::build(dots, 3.0);
        let p = Vec2::new(1.0, -2.0);
        let mut count = 0;
        hash.for_each_within_sq(p, 16.0, |_| count += 1);
        assert_eq!(count, hash.query_radius(p, 4.0).len());
    }

    #[test]
    fn empty_hash_returns_nothing() {
        let hash: SpatialHash<Dot> = SpatialHash::empty(4.0);
        assert!(hash.is_empty());
        assert!(hash.query_radius(Vec2::ZERO, 100.0).is_empty());
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let hash = SpatialHash::build(vec![Dot { id: 0, pos: Vec2::new(2.0, 0.0) }], 4.0);
        assert_eq!(hash.query_radius(Vec2::ZERO, 2.0).len(), 1);
        assert!(hash.query_radius(Vec2::ZERO, 1.99).is_empty());
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let dots = vec![
            Dot { id: 0, pos: Vec2::new(-0.1, -0.1) },
            Dot { id: 1, pos: Vec2::new(0.1, 0.1) },
        ];
        let hash = SpatialHash::build(dots, 4.0);
        assert_eq!(hash.cell_count(), 2);
        assert_eq!(hash.query_radius(Vec2::ZERO, 0.5).len(), 2);
    }
}

// ── StaticLayer ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod static_layer {
    use super::*;

    #[test]
    fn building_interior_is_blocked() {
        let layer = village();
        assert!(layer.is_blocked(Vec2::new(-10.0, 0.0), 0.3));
        assert!(layer.is_blocked(Vec2::new(-7.1, 0.0), 0.3)); // grazes east wall
        assert!(!layer.is_blocked(Vec2::new(-5.0, 0.0), 0.3));
    }

    #[test]
    fn obstacle_and_bounds_block() {
        let layer = village();
        assert!(layer.is_blocked(Vec2::new(0.0, -10.0), 0.3));
        assert!(layer.is_blocked(Vec2::new(29.9, 0.0), 0.3));
        assert!(!layer.is_blocked(Vec2::new(0.0, 0.0), 0.3));
    }

    #[test]
    fn doors_are_walkable() {
        let layer = village();
        for b in layer.buildings() {
            assert!(!layer.is_blocked(b.door(), 0.3), "door of {} blocked", b.id);
        }
        // South entrance: door sits below the footprint.
        let door = layer.entrance(BuildingId(1)).unwrap();
        assert!((door.x + 10.0).abs() < 1e-6);
        assert!(door.y < -2.0);
    }

    #[test]
    fn nearest_entrance_picks_closest_door() {
        let layer = village();
        let (id, _) = layer.nearest_entrance(Vec2::new(-12.0, -8.0)).unwrap();
        assert_eq!(id, BuildingId(1));
        let (id, _) = layer.nearest_entrance(Vec2::new(12.0, 3.0)).unwrap();
        assert_eq!(id, BuildingId(2));
    }

    #[test]
    fn no_buildings_no_entrance() {
        let layer = StaticLayer::build(TileGeometry::open(Bounds::square(10.0)), 4.0);
        assert!(layer.nearest_entrance(Vec2::ZERO).is_none());
        assert!(layer.entrance(BuildingId(0)).is_none());
    }

    #[test]
    fn kind_filter() {
        let layer = village();
        let kinds = [BuildingKind::Religious];
        let ids: Vec<_> = layer.buildings_of_kind(&kinds).map(|b| b.id).collect();
        assert_eq!(ids, vec![BuildingId(2)]);
    }

    #[test]
    fn ring_search_escapes_building() {
        let layer = village();
        let mut rng = SmallRng::seed_from_u64(1);
        // Anchor inside house 1 near its south wall; ring 1–2 reaches outside.
        let anchor = Vec2::new(-10.0, -1.5);
        let p = layer.find_open_point(anchor, 0.3, &mut rng);
        assert!(!layer.is_blocked(p, 0.3));
        assert!(p.distance_squared(anchor) <= 16.0 + 1e-3);
    }

    #[test]
    fn ring_search_returns_open_anchor_unchanged() {
        let layer = village();
        let mut rng = SmallRng::seed_from_u64(1);
        let anchor = Vec2::new(0.0, 5.0);
        assert_eq!(layer.find_open_point(anchor, 0.3, &mut rng), anchor);
    }

    #[test]
    fn ring_search_falls_back_to_anchor() {
        // Bounds too small for any disc: everything is blocked.
        let layer = StaticLayer::build(TileGeometry::open(Bounds::square(0.1)), 4.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let anchor = Vec2::new(0.05, 0.0);
        assert_eq!(layer.find_open_point(anchor, 0.3, &mut rng), anchor);
    }

    #[test]
    fn exit_point_is_near_door_and_open() {
        let layer = village();
        let mut rng = SmallRng::seed_from_u64(3);
        let door = layer.entrance(BuildingId(2)).unwrap();
        for _ in 0..20 {
            let p = layer.exit_point(door, 0.3, &mut rng);
            assert!(p.distance_squared(door) <= 2.5 * 2.5 + 1e-3);
            if p != door {
                assert!(!layer.is_blocked(p, 0.3));
            }
        }
    }
}
