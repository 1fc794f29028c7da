// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage summary types returned from layout.

use alloc::vec::Vec;
use kurbo::Rect;

/// Rectangles that need repainting after a [`crate::Treemap::rebuild`].
///
/// Contains the old and new rectangles of every tile that was added, removed,
/// moved, resized or recoloured. The rectangles may overlap and are not a
/// minimal cover.
///
/// ```
/// use kurbo::Rect;
/// use treemap_layout::{SliceAndDice, Treemap};
/// use treemap_tree::Tree;
///
/// let mut tree = Tree::new("root");
/// let root = tree.root();
/// let a = tree.insert(root, "A", 100).unwrap();
/// tree.insert(root, "B", 100).unwrap();
/// let mut map = Treemap::build(&tree, Rect::new(0.0, 0.0, 200.0, 100.0), SliceAndDice);
///
/// tree.set_value(a, 300);
/// let damage = map.rebuild(&tree);
/// // A now takes three quarters of the width, so both tiles moved.
/// assert_eq!(damage.union_rect(), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Returns true if nothing needs repainting.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    pub(crate) fn push(&mut self, rect: Rect) {
        if rect.area() > 0.0 {
            self.dirty_rects.push(rect);
        }
    }
}
