// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Index: a generic 2D AABB index for hit testing.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or intersecting rectangle.
//! - Resolve overlaps deterministically with [`IndexGeneric::first_at_point`].
//!
//! It is generic over the scalar type `T` and does not depend on any geometry crate.
//! Higher layers (like a treemap layout) compute world-space AABBs and feed them here.
//!
//! Backends are pluggable via the [`Backend`] trait so the spatial strategy can change
//! without API churn. The default backend is a flat vector (linear scan); a uniform
//! grid is available with the `backend_grid` feature.
//!
//! ## Features
//!
//! - `backend_grid` *(default)*: enables a uniform grid backend backed by `hashbrown`
//!   and `smallvec`.
//!
//! # Example
//!
//! ```rust
//! use treemap_index::{Aabb2D, Index};
//!
//! let mut idx: Index<i64, u32> = Index::new();
//! let left = idx.insert(Aabb2D::new(0, 0, 10, 10), 1);
//! let _right = idx.insert(Aabb2D::new(10, 0, 20, 10), 2);
//!
//! // Both boxes contain the shared edge; the earlier insert wins.
//! assert_eq!(idx.query_point(10, 5).count(), 2);
//! assert_eq!(idx.first_at_point(10, 5), Some((left, 1)));
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): linear scans. Good for a few hundred tiles.
//! - `GridF64`/`GridI64` *(feature `backend_grid`)*: uniform grid with configurable
//!   cell size. A good fit when there are many small tiles roughly uniformly spread
//!   over the viewport.
//!
//! This crate assumes no NaNs for floating-point coordinates.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use index::{Index, IndexGeneric, Key};
pub use types::{Aabb2D, Scalar};
