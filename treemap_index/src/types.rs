// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boxes and the scalars they are made of.

use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Edges belong to the box: a point on the shared edge of two tiles is inside
/// both, and [`IndexGeneric::first_at_point`][crate::IndexGeneric::first_at_point]
/// breaks the tie.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Left.
    pub min_x: T,
    /// Top.
    pub min_y: T,
    /// Right.
    pub max_x: T,
    /// Bottom.
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// A box from its top-left and bottom-right corners.
    #[inline(always)]
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether `(x, y)` lies inside or on the edge.
    #[inline]
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Whether the boxes share at least one point.
    ///
    /// ```
    /// use treemap_index::Aabb2D;
    ///
    /// let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.overlaps(&Aabb2D::new(10.0, 0.0, 20.0, 10.0)));
    /// assert!(!a.overlaps(&Aabb2D::new(11.0, 0.0, 20.0, 10.0)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.min_x <= self.max_x
            && self.min_x <= other.max_x
            && other.min_y <= self.max_y
            && self.min_y <= other.max_y
    }

    /// Whether the box has no area. Assumes no NaN.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.min_x < self.max_x && self.min_y < self.max_y)
    }
}

/// Coordinate types the index accepts.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// The origin coordinate.
    const ZERO: Self;
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
}

impl Scalar for i64 {
    const ZERO: Self = 0;
}
