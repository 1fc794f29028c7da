// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for 2D AABBs.
//!
//! Boxes are bucketed into square cells; a point query touches a single cell
//! and a rectangle query only the cells it covers. Treemap tiles are disjoint
//! and cover the viewport, so with a cell size near the typical tile size each
//! cell holds a handful of slots.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar};

/// Scalar types supported by the grid backend.
pub trait GridScalar: Scalar {
    /// Map a coordinate to a cell coordinate along one axis, rounding toward
    /// negative infinity and saturating to the `i32` range.
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32;
}

impl GridScalar for f64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
    )]
    #[inline]
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
        debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
        let t = (value - origin) / cell_size;
        let coord = t as i32;
        if t < 0.0 && Self::from(coord) > t {
            coord.saturating_sub(1)
        } else {
            coord
        }
    }
}

impl GridScalar for i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
    )]
    #[inline]
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
        debug_assert!(cell_size > 0, "grid cell_size must be strictly positive");
        let coord = value.saturating_sub(origin).div_euclid(cell_size);
        coord.clamp(Self::from(i32::MIN), Self::from(i32::MAX)) as i32
    }
}

type CellKey = (i32, i32);

/// Uniform grid backend with fixed cell size.
pub struct Grid<T: GridScalar> {
    cell_size: T,
    origin: (T, T),
    cells: HashMap<CellKey, SmallVec<[usize; 8]>>,
    slots: Vec<Option<Placed<T>>>,
}

#[derive(Clone, Debug)]
struct Placed<T> {
    aabb: Aabb2D<T>,
    cells: SmallVec<[CellKey; 4]>,
}

impl<T: GridScalar> Debug for Grid<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let live = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("origin", &self.origin)
            .field("live_slots", &live)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl<T: GridScalar> Grid<T> {
    /// Create a grid with the given cell size and its origin at (0, 0).
    pub fn new(cell_size: T) -> Self {
        Self::with_origin(cell_size, T::ZERO, T::ZERO)
    }

    /// Create a grid with the given cell size and origin.
    pub fn with_origin(cell_size: T, origin_x: T, origin_y: T) -> Self {
        debug_assert!(cell_size > T::ZERO, "cell_size must be strictly positive");
        Self {
            cell_size,
            origin: (origin_x, origin_y),
            cells: HashMap::new(),
            slots: Vec::new(),
        }
    }

    fn span(&self, min: T, max: T, origin: T) -> (i32, i32) {
        let a = T::cell_coord(min, origin, self.cell_size);
        let b = T::cell_coord(max, origin, self.cell_size);
        (a.min(b), a.max(b))
    }

    fn cells_covering(&self, aabb: &Aabb2D<T>) -> SmallVec<[CellKey; 4]> {
        let (x0, x1) = self.span(aabb.min_x, aabb.max_x, self.origin.0);
        let (y0, y1) = self.span(aabb.min_y, aabb.max_y, self.origin.1);
        let mut out = SmallVec::new();
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                out.push((ix, iy));
            }
        }
        out
    }

    fn detach(&mut self, slot: usize, cells: &[CellKey]) {
        for key in cells {
            let Some(bucket) = self.cells.get_mut(key) else {
                continue;
            };
            if let Some(pos) = bucket.iter().position(|&s| s == slot) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.cells.remove(key);
            }
        }
    }

    fn attach(&mut self, slot: usize, aabb: Aabb2D<T>) {
        let cells = self.cells_covering(&aabb);
        for key in &cells {
            self.cells.entry(*key).or_default().push(slot);
        }
        self.slots[slot] = Some(Placed { aabb, cells });
    }
}

impl<T: GridScalar> Backend<T> for Grid<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        if let Some(old) = self.slots[slot].take() {
            self.detach(slot, &old.cells);
        }
        self.attach(slot, aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if let Some(Some(placed)) = self.slots.get(slot)
            && placed.aabb == aabb
        {
            return;
        }
        self.insert(slot, aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.slots.get_mut(slot).and_then(Option::take) {
            self.detach(slot, &old.cells);
        }
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
    }

    fn visit_point<F: FnMut(usize)>(&self, x: T, y: T, mut f: F) {
        let ix = T::cell_coord(x, self.origin.0, self.cell_size);
        let iy = T::cell_coord(y, self.origin.1, self.cell_size);
        let Some(bucket) = self.cells.get(&(ix, iy)) else {
            return;
        };
        for &slot in bucket {
            if let Some(Some(placed)) = self.slots.get(slot)
                && placed.aabb.contains_point(x, y)
            {
                f(slot);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, mut f: F) {
        let mut seen: HashSet<usize> = HashSet::new();
        for key in self.cells_covering(&rect) {
            let Some(bucket) = self.cells.get(&key) else {
                continue;
            };
            for &slot in bucket {
                if !seen.insert(slot) {
                    continue;
                }
                if let Some(Some(placed)) = self.slots.get(slot)
                    && placed.aabb.overlaps(&rect)
                {
                    f(slot);
                }
            }
        }
    }
}

/// Grid backend over `f64` coordinates.
pub type GridF64 = Grid<f64>;
/// Grid backend over `i64` coordinates.
pub type GridI64 = Grid<i64>;
