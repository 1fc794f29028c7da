// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the region tree: node identifiers, colours, and resize steps.

/// Identifier for a node in the tree (generational).
///
/// The first field is the slot index, the second the generation of that slot at
/// the time the node was inserted. Once a node is removed, its identifier never
/// resolves again, even if the slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// An opaque RGB colour assigned to every node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Derive a colour from a 64-bit seed.
    ///
    /// The mapping is a `SplitMix64` finalizer, so neighbouring seeds produce
    /// unrelated colours.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Each channel takes one byte of the mixed seed."
    )]
    pub const fn from_seed(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Self::new(z as u8, (z >> 8) as u8, (z >> 16) as u8)
    }
}

/// A one-step change to a leaf's value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resize {
    /// Add 1% of the current value, rounded up.
    Grow,
    /// Subtract 1% of the current value, rounded up, unless that would take the
    /// value below 1.
    Shrink,
}

impl Resize {
    /// The amount a step changes `value` by: 1% rounded up.
    #[inline]
    pub const fn step(value: u64) -> u64 {
        value.div_ceil(100)
    }
}
