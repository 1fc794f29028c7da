// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Layout: turn a weighted [`treemap_tree::Tree`] into rectangles.
//!
//! - [`Tiling`] policies divide a rectangle among weighted children:
//!   [`SliceAndDice`] (integral, splits along the longer side) and
//!   [`Squarified`] (better aspect ratios, exact areas).
//! - [`Treemap`] lays out a whole tree recursively from the root, producing one
//!   [`Tile`] per non-empty leaf, and answers "which leaf is under this point?"
//!   through a [`treemap_index`] hit index.
//! - [`Treemap::rebuild`] re-lays out after the tree changed and returns
//!   [`Damage`]: the rectangles that need repainting.
//!
//! Every child's area is its share of the parent's area, in proportion to its
//! share of the parent's value (exactly for [`Squarified`], to within one unit
//! along the split axis for [`SliceAndDice`]).
//!
//! ## Features
//!
//! - `std` *(default)*: use `std` float math.
//! - `libm`: float math for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod tiling;
mod treemap;

pub use damage::Damage;
pub use tiling::{SliceAndDice, Squarified, Tiling, TilingKind};
pub use treemap::{Tile, Treemap};
