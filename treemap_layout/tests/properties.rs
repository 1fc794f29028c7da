// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile areas follow values across random trees.

use std::collections::HashMap;

use kurbo::Rect;
use proptest::prelude::*;
use treemap_layout::{SliceAndDice, Squarified, Tiling, Treemap};
use treemap_tree::{NodeId, Tree};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 1000.0, 700.0);

/// Each `(pick, value)` inserts a node under one of the nodes built so far.
fn build(shape: &[(usize, u64)]) -> Tree {
    let mut tree = Tree::new("root");
    let mut nodes = vec![tree.root()];
    for (i, &(pick, value)) in shape.iter().enumerate() {
        let parent = nodes[pick % nodes.len()];
        nodes.push(tree.insert(parent, format!("n{i}"), value).unwrap());
    }
    tree
}

/// The area covered by each node: its own tile, or the tiles below it.
fn areas<L: Tiling>(tree: &Tree, map: &Treemap<L>) -> HashMap<NodeId, f64> {
    let mut out = HashMap::new();
    for tile in map.tiles() {
        let area = tile.rect.area();
        *out.entry(tile.node).or_insert(0.0) += area;
        for ancestor in tree.ancestors(tile.node) {
            *out.entry(ancestor).or_insert(0.0) += area;
        }
    }
    out
}

/// Compare each non-empty child's area with its share of its parent's area.
/// `slack(children)` bounds the error allowed for a parent with that many
/// non-empty children.
fn check_shares<L: Tiling>(
    tree: &Tree,
    map: &Treemap<L>,
    slack: impl Fn(usize) -> f64,
) -> Result<(), TestCaseError> {
    let areas = areas(tree, map);
    let mut current = Some(tree.root());
    while let Some(id) = current {
        current = tree.next_depth_first(id);
        let total = tree.value(id).unwrap();
        let children: Vec<NodeId> = tree
            .children_of(id)
            .iter()
            .copied()
            .filter(|&c| tree.value(c) > Some(0))
            .collect();
        if total == 0 || children.is_empty() {
            continue;
        }
        let parent_area = areas[&id];
        for child in &children {
            let expected = parent_area * tree.value(*child).unwrap() as f64 / total as f64;
            let got = areas.get(child).copied().unwrap_or(0.0);
            prop_assert!(
                (got - expected).abs() <= slack(children.len()),
                "{:?}: {got} vs {expected}",
                tree.path(*child)
            );
        }
    }
    Ok(())
}

fn shapes() -> impl Strategy<Value = Vec<(usize, u64)>> {
    prop::collection::vec((any::<usize>(), 0_u64..10_000), 1..40)
}

proptest! {
    #[test]
    fn squarified_areas_are_exact_shares(shape in shapes()) {
        let tree = build(&shape);
        let map = Treemap::build(&tree, BOUNDS, Squarified);
        check_shares(&tree, &map, |_| 1e-6 * BOUNDS.area())?;
    }

    #[test]
    fn slice_and_dice_areas_are_shares_within_a_pixel_per_split(shape in shapes()) {
        let tree = build(&shape);
        let map = Treemap::build(&tree, BOUNDS, SliceAndDice);
        // Each floored share loses under one pixel along the split axis, and
        // the last child takes them all back.
        let side = BOUNDS.width().max(BOUNDS.height());
        check_shares(&tree, &map, |n| n as f64 * side)?;

        let covered: f64 = map.tiles().iter().map(|t| t.rect.area()).sum();
        if tree.value(tree.root()) > Some(0) {
            prop_assert_eq!(covered, BOUNDS.area());
        }
    }

    #[test]
    fn every_tile_is_a_non_empty_leaf(shape in shapes()) {
        let tree = build(&shape);
        let map = Treemap::build(&tree, BOUNDS, Squarified);
        let nodes: Vec<NodeId> = map.tiles().iter().map(|t| t.node).collect();
        prop_assert_eq!(nodes, tree.leaves());
        for tile in map.tiles() {
            let r = tile.rect;
            prop_assert!(
                r.x0 >= -1e-6 && r.y0 >= -1e-6 && r.x1 <= 1000.0 + 1e-6 && r.y1 <= 700.0 + 1e-6,
                "{r:?} leaves the bounds"
            );
        }
    }
}
