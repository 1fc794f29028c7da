// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The laid-out treemap: tiles, point lookup and repaint damage.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use treemap_index::backends::FlatVec;
use treemap_index::{Aabb2D, Backend, IndexGeneric};
use treemap_tree::{NodeId, Rgb, Tree};

use crate::damage::Damage;
use crate::tiling::{Tiling, TilingKind};

/// One painted rectangle: a non-empty leaf and where it landed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// The leaf this tile shows.
    pub node: NodeId,
    /// World-space rectangle of the tile. May have zero area when the leaf's
    /// share rounds down to nothing.
    pub rect: Rect,
    /// Fill colour of the leaf at layout time.
    pub colour: Rgb,
}

/// A treemap laid out from a [`Tree`].
///
/// The layout is a snapshot: after mutating the tree, call [`Treemap::rebuild`]
/// to lay it out again and learn which rectangles need repainting.
///
/// Tiles are produced in [`Tree::leaves`] order. Where two tiles touch, the
/// shared edge belongs to the earlier tile for the purposes of
/// [`Treemap::leaf_at`].
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use treemap_layout::{SliceAndDice, Treemap};
/// use treemap_tree::Tree;
///
/// let mut tree = Tree::new("World");
/// let root = tree.root();
/// let a = tree.insert(root, "A", 1).unwrap();
/// let b = tree.insert(root, "B", 3).unwrap();
///
/// let mut map = Treemap::build(&tree, Rect::new(0.0, 0.0, 400.0, 100.0), SliceAndDice);
/// assert_eq!(map.tile_of(a).unwrap().rect, Rect::new(0.0, 0.0, 100.0, 100.0));
/// assert_eq!(map.leaf_at(Point::new(250.0, 50.0)), Some(b));
///
/// tree.remove_leaf(a);
/// let damage = map.rebuild(&tree);
/// assert_eq!(damage.union_rect(), Some(Rect::new(0.0, 0.0, 400.0, 100.0)));
/// assert_eq!(map.leaf_at(Point::new(50.0, 50.0)), Some(b));
/// ```
pub struct Treemap<L: Tiling = TilingKind, B: Backend<f64> = FlatVec<f64>> {
    tiling: L,
    bounds: Rect,
    tiles: Vec<Tile>,
    by_node: HashMap<NodeId, usize>,
    index: IndexGeneric<f64, usize, B>,
}

impl<L: Tiling + Debug, B: Backend<f64>> Debug for Treemap<L, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Treemap")
            .field("tiling", &self.tiling)
            .field("bounds", &self.bounds)
            .field("tiles", &self.tiles.len())
            .field("indexed", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl<L: Tiling> Treemap<L> {
    /// Lay out `tree` into `bounds` using a linear-scan hit index.
    pub fn build(tree: &Tree, bounds: Rect, tiling: L) -> Self {
        Self::build_with_backend(tree, bounds, tiling, FlatVec::default())
    }
}

impl<L: Tiling, B: Backend<f64>> Treemap<L, B> {
    /// Lay out `tree` into `bounds`, indexing tiles with `backend`.
    pub fn build_with_backend(tree: &Tree, bounds: Rect, tiling: L, backend: B) -> Self {
        let mut map = Self {
            tiling,
            bounds: bounds.abs(),
            tiles: Vec::new(),
            by_node: HashMap::new(),
            index: IndexGeneric::with_backend(backend),
        };
        map.rebuild(tree);
        map
    }

    /// The rectangle the root is laid out into.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Change the rectangle the root is laid out into.
    ///
    /// Takes effect on the next [`Treemap::rebuild`].
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds.abs();
    }

    /// The tiling policy.
    pub fn tiling(&self) -> &L {
        &self.tiling
    }

    /// All tiles in leaf order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// The tile showing `node`, if it is a non-empty leaf.
    pub fn tile_of(&self, node: NodeId) -> Option<&Tile> {
        self.by_node.get(&node).map(|&i| &self.tiles[i])
    }

    /// The first tile (in leaf order) whose closed rectangle contains `point`.
    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.index
            .first_at_point(point.x, point.y)
            .map(|(_, i)| &self.tiles[i])
    }

    /// The leaf whose tile contains `point`, or `None` outside every tile.
    pub fn leaf_at(&self, point: Point) -> Option<NodeId> {
        self.tile_at(point).map(|t| t.node)
    }

    /// Lay out `tree` again and return the rectangles that changed.
    ///
    /// Damage holds the old and new rectangles of every tile that moved,
    /// appeared, disappeared or changed colour.
    pub fn rebuild(&mut self, tree: &Tree) -> Damage {
        let tiles = self.lay_out(tree);

        let mut damage = Damage::default();
        let mut by_node = HashMap::with_capacity(tiles.len());
        for (i, tile) in tiles.iter().enumerate() {
            by_node.insert(tile.node, i);
            match self.tile_of(tile.node) {
                Some(old) if old.rect == tile.rect && old.colour == tile.colour => {}
                Some(old) => {
                    if old.rect != tile.rect {
                        damage.push(old.rect);
                    }
                    damage.push(tile.rect);
                }
                None => damage.push(tile.rect),
            }
        }
        for old in &self.tiles {
            if !by_node.contains_key(&old.node) {
                damage.push(old.rect);
            }
        }

        // The index is rebuilt in tile order so that earlier tiles win on shared edges.
        self.index.clear();
        for (i, tile) in tiles.iter().enumerate() {
            if tile.rect.area() > 0.0 {
                self.index.insert(rect_to_aabb(tile.rect), i);
            }
        }
        self.tiles = tiles;
        self.by_node = by_node;
        damage
    }

    fn lay_out(&self, tree: &Tree) -> Vec<Tile> {
        let mut tiles = Vec::new();
        let mut weights = Vec::new();
        let mut rects = Vec::new();
        // Depth-first; children are pushed in reverse so they pop in order.
        let mut stack = vec![(tree.root(), self.bounds)];
        while let Some((id, rect)) = stack.pop() {
            let children = tree.children_of(id);
            if children.is_empty() {
                if tree.value(id).unwrap_or(0) > 0 {
                    tiles.push(Tile {
                        node: id,
                        rect,
                        colour: tree.colour(id).unwrap_or(Rgb::BLACK),
                    });
                }
                continue;
            }
            weights.clear();
            weights.extend(children.iter().map(|&c| tree.value(c).unwrap_or(0)));
            self.tiling.tile(rect, &weights, &mut rects);
            for ((&child, &r), &w) in children.iter().zip(&rects).zip(&weights).rev() {
                if w > 0 {
                    stack.push((child, r));
                }
            }
        }
        tiles
    }
}

fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::{SliceAndDice, Squarified};
    use treemap_tree::Resize;

    fn world() -> (Tree, [NodeId; 5]) {
        let mut tree = Tree::new("World").with_colour_seed(7);
        let root = tree.root();
        let europe = tree.insert(root, "Europe", 0).unwrap();
        let asia = tree.insert(root, "Asia", 0).unwrap();
        let france = tree.insert(europe, "France", 300).unwrap();
        let spain = tree.insert(europe, "Spain", 100).unwrap();
        let japan = tree.insert(asia, "Japan", 400).unwrap();
        (tree, [europe, asia, france, spain, japan])
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    #[test]
    fn tiles_follow_leaf_order() {
        let (tree, _) = world();
        let map = Treemap::build(&tree, bounds(), SliceAndDice);
        let nodes: Vec<_> = map.tiles().iter().map(|t| t.node).collect();
        assert_eq!(nodes, tree.leaves());
    }

    #[test]
    fn slice_and_dice_nests() {
        let (tree, [_, _, france, spain, japan]) = world();
        let map = Treemap::build(&tree, bounds(), SliceAndDice);
        // Root splits 800 wide in half; each half is 400×600 so it splits vertically.
        assert_eq!(map.tile_of(france).unwrap().rect, Rect::new(0.0, 0.0, 400.0, 450.0));
        assert_eq!(map.tile_of(spain).unwrap().rect, Rect::new(0.0, 450.0, 400.0, 600.0));
        assert_eq!(map.tile_of(japan).unwrap().rect, Rect::new(400.0, 0.0, 800.0, 600.0));
        assert_eq!(map.tile_of(france).unwrap().colour, tree.colour(france).unwrap());
    }

    #[test]
    fn areas_are_proportional_to_values() {
        let values = [5_u32, 17, 3, 40, 11, 24];
        let mut tree = Tree::new("root");
        let top = tree.root();
        let group = tree.insert(top, "group", 0).unwrap();
        let mut leaves = Vec::new();
        for (i, v) in values.into_iter().enumerate() {
            let parent = if i % 2 == 0 { group } else { top };
            leaves.push((tree.insert(parent, "leaf", u64::from(v)).unwrap(), v));
        }
        let rect = Rect::new(0.0, 0.0, 1000.0, 700.0);
        let total = f64::from(values.iter().sum::<u32>());

        let squarified = Treemap::build(&tree, rect, Squarified);
        for &(id, v) in &leaves {
            let expected = rect.area() * f64::from(v) / total;
            let got = squarified.tile_of(id).unwrap().rect.area();
            assert!((got - expected).abs() < 1e-6, "squarified {got} vs {expected}");
        }

        // Slice-and-dice floors, so each split may be off by under a pixel along
        // the split axis; two levels of nesting bound the error.
        let sliced = Treemap::build(&tree, rect, SliceAndDice);
        for &(id, v) in &leaves {
            let expected = rect.area() * f64::from(v) / total;
            let got = sliced.tile_of(id).unwrap().rect.area();
            assert!((got - expected).abs() <= 2.0 * 1000.0, "sliced {got} vs {expected}");
        }

        // Tiles cover the bounds exactly.
        let covered: f64 = sliced.tiles().iter().map(|t| t.rect.area()).sum();
        assert_eq!(covered, rect.area());
    }

    #[test]
    fn leaf_at_resolves_points_and_shared_edges() {
        let (tree, [_, _, france, spain, japan]) = world();
        let map = Treemap::build(&tree, bounds(), SliceAndDice);
        assert_eq!(map.leaf_at(Point::new(10.0, 10.0)), Some(france));
        assert_eq!(map.leaf_at(Point::new(10.0, 500.0)), Some(spain));
        assert_eq!(map.leaf_at(Point::new(700.0, 10.0)), Some(japan));
        // Edge between France and Spain; France comes first.
        assert_eq!(map.leaf_at(Point::new(10.0, 450.0)), Some(france));
        // Edge between Europe and Asia.
        assert_eq!(map.leaf_at(Point::new(400.0, 500.0)), Some(spain));
        assert_eq!(map.leaf_at(Point::new(900.0, 10.0)), None);
        assert_eq!(map.leaf_at(Point::new(-1.0, 10.0)), None);
    }

    #[test]
    fn zero_valued_leaves_get_no_tile() {
        let (mut tree, [europe, ..]) = world();
        let empty = tree.insert(europe, "Atlantis", 0).unwrap();
        let map = Treemap::build(&tree, bounds(), SliceAndDice);
        assert!(map.tile_of(empty).is_none());
        assert_eq!(map.tiles().len(), 3);
    }

    #[test]
    fn root_leaf_fills_bounds() {
        let mut tree = Tree::new("solo");
        tree.set_value(tree.root(), 5);
        let map = Treemap::build(&tree, bounds(), Squarified);
        assert_eq!(map.tiles().len(), 1);
        assert_eq!(map.tiles()[0].rect, bounds());
        assert_eq!(map.leaf_at(Point::new(1.0, 1.0)), Some(tree.root()));

        let empty = Treemap::build(&Tree::new("nothing"), bounds(), Squarified);
        assert!(empty.tiles().is_empty());
        assert_eq!(empty.leaf_at(Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn rebuild_reports_only_changed_tiles() {
        let (mut tree, [_, _, france, spain, japan]) = world();
        let mut map = Treemap::build(&tree, bounds(), SliceAndDice);
        assert!(map.rebuild(&tree).is_empty());

        // Recolouring Japan damages its tile only.
        tree.set_colour(japan, Rgb::WHITE);
        let damage = map.rebuild(&tree);
        assert_eq!(damage.dirty_rects, vec![Rect::new(400.0, 0.0, 800.0, 600.0)]);

        // Growing Spain moves the France/Spain split; the Europe/Asia split
        // still floors to 400.
        tree.resize(spain, Resize::Grow);
        let damage = map.rebuild(&tree);
        assert_eq!(damage.union_rect(), Some(Rect::new(0.0, 0.0, 400.0, 600.0)));
        assert_eq!(map.tile_of(france).unwrap().rect, Rect::new(0.0, 0.0, 400.0, 448.0));
        assert!(!damage.dirty_rects.contains(&map.tile_of(japan).unwrap().rect));
    }

    #[test]
    fn removed_tiles_are_damaged_and_unindexed() {
        let (mut tree, [europe, _, france, spain, japan]) = world();
        let mut map = Treemap::build(&tree, bounds(), SliceAndDice);
        tree.remove_leaf(france);
        tree.remove_leaf(spain);
        assert!(!tree.is_alive(europe));

        let damage = map.rebuild(&tree);
        assert!(damage.dirty_rects.contains(&Rect::new(0.0, 0.0, 400.0, 450.0)));
        assert_eq!(map.tile_of(france), None);
        assert_eq!(map.leaf_at(Point::new(10.0, 10.0)), Some(japan));
        assert_eq!(map.tile_of(japan).unwrap().rect, bounds());
    }

    #[test]
    fn set_bounds_applies_on_rebuild() {
        let (tree, [.., japan]) = world();
        let mut map = Treemap::build(&tree, bounds(), SliceAndDice);
        map.set_bounds(Rect::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(map.tile_of(japan).unwrap().rect.x1, 800.0);
        let damage = map.rebuild(&tree);
        assert_eq!(map.tile_of(japan).unwrap().rect, Rect::new(200.0, 0.0, 400.0, 300.0));
        assert!(!damage.is_empty());
    }

    #[test]
    fn zero_area_tiles_are_not_hit() {
        let mut tree = Tree::new("root");
        let root = tree.root();
        let big = tree.insert(root, "big", 1000).unwrap();
        let tiny = tree.insert(root, "tiny", 1).unwrap();
        let last = tree.insert(root, "last", 1000).unwrap();
        let map = Treemap::build(&tree, Rect::new(0.0, 0.0, 100.0, 10.0), SliceAndDice);
        let tiny_rect = map.tile_of(tiny).unwrap().rect;
        assert_eq!(tiny_rect.width(), 0.0);
        assert_eq!(map.leaf_at(Point::new(tiny_rect.x0, 5.0)), Some(big));
        assert_eq!(map.leaf_at(Point::new(90.0, 5.0)), Some(last));
    }

    #[test]
    fn grid_backend_agrees_with_flat() {
        use treemap_index::backends::GridF64;

        let (tree, _) = world();
        let flat = Treemap::build(&tree, bounds(), Squarified);
        let grid = Treemap::build_with_backend(&tree, bounds(), Squarified, GridF64::new(64.0));
        for x in (0..=800).step_by(37) {
            for y in (0..=600).step_by(41) {
                let p = Point::new(f64::from(x), f64::from(y));
                assert_eq!(flat.leaf_at(p), grid.leaf_at(p), "mismatch at {p:?}");
            }
        }
    }
}
