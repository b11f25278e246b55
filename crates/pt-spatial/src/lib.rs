//! `pt-spatial` — neighbor queries and static world geometry.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`hash`]     | `SpatialHash<T>` — rebuild-only uniform grid, `Positioned`   |
//! | [`geometry`] | Building/obstacle footprints, `WorldGeometryProvider`        |
//! | [`layer`]    | `StaticLayer` — collision grid, entrance R-tree, ring search |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on geometry types.         |

pub mod geometry;
pub mod hash;
pub mod layer;

#[cfg(test)]
mod tests;

pub use geometry::{
    Bounds, BuildingFootprint, BuildingKind, EntranceSide, Obstacle, OpenField, TileGeometry,
    WorldGeometryProvider,
};
pub use hash::{Positioned, SpatialHash};
pub use layer::StaticLayer;
