//! Uniform-grid spatial hash.
//!
//! # Design
//!
//! The hash is **rebuilt, never mutated**: [`SpatialHash::build`] takes
//! ownership of a fresh batch of entries and buckets them by cell.  A hash in
//! use is therefore an immutable snapshot, and queries never observe a
//! half-updated index.
//!
//! Cells are keyed `(floor(x / cell), floor(y / cell))` in an `FxHashMap`, so
//! only occupied cells cost memory.  With `cell_size` ≈ the largest common
//! query radius, a query touches the 3×3 block around the point.  Larger
//! radii are still exact; they just visit more cells.

use rustc_hash::FxHashMap;

use pt_core::Vec2;

/// Anything with a plane position can be indexed.
pub trait Positioned {
    fn position(&self) -> Vec2;
}

type CellKey = (i32, i32);

/// Read-only grid index over a batch of entries.
pub struct SpatialHash<T> {
    cell_size: f32,
    entries:   Vec<T>,
    /// Cell → indices into `entries`.
    cells:     FxHashMap<CellKey, Vec<u32>>,
}

impl<T: Positioned> SpatialHash<T> {
    /// An index with no entries.
    pub fn empty(cell_size: f32) -> Self {
        Self::build(Vec::new(), cell_size)
    }

    /// Bucket `entries` by cell.  O(n).
    ///
    /// `cell_size` is clamped to a small positive minimum so degenerate
    /// configurations cannot produce infinite cell coordinates.
    pub fn build(entries: Vec<T>, cell_size: f32) -> Self {
        let cell_size = cell_size.max(0.01);
        let mut cells: FxHashMap<CellKey, Vec<u32>> = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            cells
                .entry(cell_of(entry.position(), cell_size))
                .or_default()
                .push(i as u32);
        }
        Self { cell_size, entries, cells }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All entries in build order.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Visit every entry with `distance² ≤ radius_sq` from `point`.
    pub fn for_each_within_sq<'a>(
        &'a self,
        point:     Vec2,
        radius_sq: f32,
        mut visit: impl FnMut(&'a T),
    ) {
        if radius_sq < 0.0 || self.entries.is_empty() {
            return;
        }
        let radius = radius_sq.sqrt();
        let (x0, y0) = cell_of(Vec2::new(point.x - radius, point.y - radius), self.cell_size);
        let (x1, y1) = cell_of(Vec2::new(point.x + radius, point.y + radius), self.cell_size);

        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for &i in bucket {
                    let entry = &self.entries[i as usize];
                    if entry.position().distance_squared(point) <= radius_sq {
                        visit(entry);
                    }
                }
            }
        }
    }

    /// Visit every entry within `radius` of `point`.
    #[inline]
    pub fn for_each_within<'a>(&'a self, point: Vec2, radius: f32, visit: impl FnMut(&'a T)) {
        self.for_each_within_sq(point, radius * radius, visit);
    }

    /// Entries within `radius` of `point`, in no particular order.
    pub fn query_radius(&self, point: Vec2, radius: f32) -> Vec<&T> {
        let mut out = Vec::new();
        self.for_each_within(point, radius, |e| out.push(e));
        out
    }
}

#[inline]
fn cell_of(p: Vec2, cell_size: f32) -> CellKey {
    ((p.x / cell_size).floor() as i32, (p.y / cell_size).floor() as i32)
}
