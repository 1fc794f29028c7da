// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Interaction: drive a treemap from pointer and key events.
//!
//! - [`ClickState`] turns presses and releases into clicks, tolerating small
//!   slips across tile edges.
//! - [`Visualiser`] owns a [`treemap_tree::Tree`] and its
//!   [`treemap_layout::Treemap`], and maps [`Event`]s to selection, deletion
//!   and resizing, reporting each outcome as a [`Response`].
//!
//! The crate has no windowing or rendering code. Hosts translate their native
//! input into [`Event`]s and paint from [`Visualiser::treemap`] and
//! [`Visualiser::status`].
//!
//! ## Features
//!
//! - `std` *(default)*: use `std` float math.
//! - `libm`: float math for `no_std` targets.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
mod visualiser;

pub use click::{Button, ClickResult, ClickState};
pub use visualiser::{Action, Event, Key, Response, Visualiser};
