// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Tree: a weighted region tree for treemap visualisation.
//!
//! The tree models hierarchical data where only leaves carry their own value and
//! every internal node's value is the sum of its children (world → region →
//! country populations, or folders → files sizes).
//!
//! - Nodes live in an arena and are addressed by generational [`NodeId`]s, so a
//!   removed node's identifier never resolves to a newer node.
//! - Every mutation ([`Tree::insert`], [`Tree::remove_leaf`], [`Tree::resize`],
//!   [`Tree::set_value`]) updates all ancestor sums before returning.
//! - [`Tree::leaves`] returns non-empty leaves in the order a treemap emits its
//!   tiles, and [`Tree::path`] renders a root-to-node path with a per-tree
//!   separator.
//!
//! This crate does not perform layout; see `treemap_layout` for tiling.
//!
//! ## API overview
//!
//! - [`Tree`]: container owning the nodes.
//! - [`NodeId`]: generational handle of a node.
//! - [`Rgb`]: display colour carried by every node.
//! - [`Resize`]: one-percent grow/shrink steps applied by [`Tree::resize`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{Ancestors, DEFAULT_SEPARATOR, Tree};
pub use types::{NodeId, Resize, Rgb};
