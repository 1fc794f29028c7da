// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Generational handle for entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<T, P> {
    generation: u32,
    /// Insertion sequence number; lower was inserted earlier.
    seq: u64,
    aabb: Aabb2D<T>,
    payload: P,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Changes are applied to the backend immediately, so queries always reflect
/// the latest inserts, updates and removals.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T>> {
    entries: Vec<Option<Entry<T, P>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    next_seq: u64,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T>,
{
    /// Create an empty index using an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_seq: 0,
            backend,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }

    /// Whether the index holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let seq = self.next_seq;
        self.next_seq += 1;
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            idx
        } else {
            self.entries.push(None);
            self.generations.push(1);
            self.entries.len() - 1
        };
        let generation = self.generations[idx];
        self.entries[idx] = Some(Entry {
            generation,
            seq,
            aabb,
            payload,
        });
        self.backend.insert(idx, aabb);
        Key::new(idx, generation)
    }

    /// Update the AABB of a live entry. Stale keys are ignored.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) {
        if let Some(e) = self.entry_mut(key) {
            e.aabb = aabb;
            self.backend.update(key.idx(), aabb);
        }
    }

    /// Remove a live entry and return its payload. Stale keys return `None`.
    pub fn remove(&mut self, key: Key) -> Option<P> {
        let payload = self.entry_mut(key)?.payload;
        self.entries[key.idx()] = None;
        self.free_list.push(key.idx());
        self.backend.remove(key.idx());
        Some(payload)
    }

    /// Remove every entry.
    ///
    /// Keys issued before the call never resolve afterwards.
    pub fn clear(&mut self) {
        for (idx, slot) in self.entries.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.backend.clear();
    }

    /// The AABB and payload of a live entry.
    pub fn get(&self, key: Key) -> Option<(Aabb2D<T>, P)> {
        let e = self.entries.get(key.idx())?.as_ref()?;
        (e.generation == key.1).then_some((e.aabb, e.payload))
    }

    /// Query for entries whose AABB contains the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        self.visit_point(x, y, |k, p| out.push((k, p)));
        out.into_iter()
    }

    /// Visit entries whose AABB contains the point (does not allocate result storage).
    ///
    /// Calls `f(key, payload)` for each match. The order is backend-dependent.
    pub fn visit_point<F: FnMut(Key, P)>(&self, x: T, y: T, mut f: F) {
        self.backend.visit_point(x, y, |i| {
            if let Some(Some(e)) = self.entries.get(i) {
                f(Key::new(i, e.generation), e.payload);
            }
        });
    }

    /// The earliest-inserted live entry whose AABB contains the point.
    ///
    /// Unlike [`IndexGeneric::visit_point`], the answer does not depend on the
    /// backend: where boxes overlap (for example on a shared edge), the entry
    /// inserted first wins.
    pub fn first_at_point(&self, x: T, y: T) -> Option<(Key, P)> {
        let mut best: Option<(u64, Key, P)> = None;
        self.backend.visit_point(x, y, |i| {
            if let Some(Some(e)) = self.entries.get(i)
                && best.is_none_or(|(seq, _, _)| e.seq < seq)
            {
                best = Some((e.seq, Key::new(i, e.generation), e.payload));
            }
        });
        best.map(|(_, k, p)| (k, p))
    }

    /// Query for entries whose AABB intersects the given rectangle.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut out = Vec::new();
        self.visit_rect(rect, |k, p| out.push((k, p)));
        out.into_iter()
    }

    /// Visit entries whose AABB intersects the given rectangle (does not allocate result storage).
    ///
    /// Calls `f(key, payload)` for each match. The order is backend-dependent.
    pub fn visit_rect<F: FnMut(Key, P)>(&self, rect: Aabb2D<T>, mut f: F) {
        self.backend.visit_rect(rect, |i| {
            if let Some(Some(e)) = self.entries.get(i) {
                f(Key::new(i, e.generation), e.payload);
            }
        });
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        let e = self.entries.get_mut(key.idx())?.as_mut()?;
        if e.generation != key.1 {
            return None;
        }
        Some(e)
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, crate::backends::FlatVec<T>>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<f64, P> {
    /// Create a grid-backed index (f64 coordinates) with the given cell size.
    pub fn with_grid(cell_size: f64) -> IndexGeneric<f64, P, crate::backends::GridF64> {
        IndexGeneric::with_backend(crate::backends::GridF64::new(cell_size))
    }
}

#[cfg(feature = "backend_grid")]
impl<P: Copy + Debug> Index<i64, P> {
    /// Create a grid-backed index (i64 coordinates) with the given cell size.
    pub fn with_grid(cell_size: i64) -> IndexGeneric<i64, P, crate::backends::GridI64> {
        IndexGeneric::with_backend(crate::backends::GridI64::new(cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn insert_update_and_query() {
        let mut idx: Index<i64, u32> = Index::new();
        let k1 = idx.insert(Aabb2D::new(0, 0, 10, 10), 1);
        idx.update(k1, Aabb2D::new(5, 5, 15, 15));

        let hits: Vec<_> = idx.query_point(12, 12).collect();
        assert_eq!(hits, vec![(k1, 1)]);
        assert_eq!(idx.query_point(1, 1).count(), 0);
    }

    #[test]
    fn removed_keys_go_stale() {
        let mut idx: Index<i64, u32> = Index::new();
        let k = idx.insert(Aabb2D::new(0, 0, 10, 10), 1);
        assert_eq!(idx.remove(k), Some(1));
        assert_eq!(idx.remove(k), None);
        assert_eq!(idx.get(k), None);
        assert!(idx.is_empty());

        let k2 = idx.insert(Aabb2D::new(0, 0, 10, 10), 2);
        assert_ne!(k, k2);
        assert_eq!(idx.get(k2), Some((Aabb2D::new(0, 0, 10, 10), 2)));
        idx.update(k, Aabb2D::new(50, 50, 60, 60));
        assert_eq!(idx.get(k2), Some((Aabb2D::new(0, 0, 10, 10), 2)));
    }

    #[test]
    fn first_at_point_prefers_earliest_insert() {
        let mut idx: Index<f64, char> = Index::new();
        let a = idx.insert(Aabb2D::new(0.0, 0.0, 10.0, 10.0), 'a');
        let _b = idx.insert(Aabb2D::new(10.0, 0.0, 20.0, 10.0), 'b');
        assert_eq!(idx.first_at_point(10.0, 5.0), Some((a, 'a')));
        assert_eq!(idx.first_at_point(15.0, 5.0).map(|(_, p)| p), Some('b'));
        assert_eq!(idx.first_at_point(25.0, 5.0), None);

        // Reusing a freed slot does not make the newer entry "earlier".
        idx.remove(a);
        let c = idx.insert(Aabb2D::new(5.0, 0.0, 10.0, 10.0), 'c');
        assert_eq!(c.idx(), a.idx());
        assert_eq!(idx.first_at_point(10.0, 5.0).map(|(_, p)| p), Some('b'));
    }

    #[test]
    fn clear_invalidates_keys() {
        let mut idx: Index<i64, u32> = Index::new();
        let k = idx.insert(Aabb2D::new(0, 0, 10, 10), 7);
        idx.clear();
        assert!(idx.is_empty());
        assert_eq!(idx.get(k), None);
        let k2 = idx.insert(Aabb2D::new(0, 0, 10, 10), 8);
        assert_ne!(k, k2);
        assert_eq!(idx.len(), 1);
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_and_flat_agree_on_first_hit() {
        let mut flat: Index<f64, u32> = Index::new();
        let mut grid = Index::<f64, u32>::with_grid(64.0);
        for (i, x) in [0.0, 100.0, 200.0, 300.0].into_iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, reason = "Small test indices.")]
            let payload = i as u32;
            flat.insert(Aabb2D::new(x, 0.0, x + 100.0, 50.0), payload);
            grid.insert(Aabb2D::new(x, 0.0, x + 100.0, 50.0), payload);
        }
        for x in [0.0, 50.0, 100.0, 150.0, 300.0, 400.0, 401.0] {
            assert_eq!(
                flat.first_at_point(x, 25.0).map(|(_, p)| p),
                grid.first_at_point(x, 25.0).map(|(_, p)| p),
                "mismatch at x = {x}"
            );
        }
        let r = Aabb2D::new(90.0, 10.0, 210.0, 20.0);
        assert_eq!(flat.query_rect(r).count(), 3);
        assert_eq!(grid.query_rect(r).count(), 3);
    }
}
