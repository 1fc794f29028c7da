// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiling policies: how a rectangle is divided among weighted children.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Rect;

/// Divides a rectangle among children proportionally to their weights.
///
/// Implementations write exactly one rectangle per weight into `out`, in the
/// same order as `weights`, after clearing it. Children with weight 0 receive an
/// empty rectangle. When every weight is 0 every child receives an empty
/// rectangle.
pub trait Tiling {
    /// Partition `rect` among `weights`.
    fn tile(&self, rect: Rect, weights: &[u64], out: &mut Vec<Rect>);
}

/// Slice-and-dice tiling.
///
/// Children are laid side by side along the longer side of the rectangle (the
/// width is used only when it is strictly greater than the height). Each child
/// gets `floor(weight / total * side)` units, and the last child with a non-zero
/// weight takes whatever remains, so the children cover the parent exactly and
/// integral input coordinates produce integral output coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceAndDice;

impl Tiling for SliceAndDice {
    fn tile(&self, rect: Rect, weights: &[u64], out: &mut Vec<Rect>) {
        out.clear();
        let rect = rect.abs();
        let total: u128 = weights.iter().map(|&w| u128::from(w)).sum();
        let Some(last) = weights.iter().rposition(|&w| w > 0) else {
            out.extend(weights.iter().map(|_| empty_at(rect.x0, rect.y0)));
            return;
        };

        let horizontal = rect.width() > rect.height();
        let side = if horizontal {
            rect.width()
        } else {
            rect.height()
        };

        let mut offset = 0.0;
        for (i, &w) in weights.iter().enumerate() {
            let len = if i == last {
                side - offset
            } else if i > last {
                0.0
            } else {
                share(u128::from(w), total, side).floor()
            };
            let r = if horizontal {
                let x = rect.x0 + offset;
                Rect::new(x, rect.y0, x + len, rect.y1)
            } else {
                let y = rect.y0 + offset;
                Rect::new(rect.x0, y, rect.x1, y + len)
            };
            out.push(r);
            offset += len;
        }
    }
}

/// Squarified tiling (Bruls, Huizing and van Wijk).
///
/// Children are placed in decreasing weight order into rows along the shorter
/// side of the remaining space, and a row is closed as soon as adding the next
/// child would worsen its worst aspect ratio. Areas are exact (no pixel
/// snapping); the output is still returned in the order of `weights`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Squarified;

impl Tiling for Squarified {
    fn tile(&self, rect: Rect, weights: &[u64], out: &mut Vec<Rect>) {
        out.clear();
        let rect = rect.abs();
        out.extend(weights.iter().map(|_| empty_at(rect.x0, rect.y0)));

        let total: u128 = weights.iter().map(|&w| u128::from(w)).sum();
        if total == 0 || rect.area() <= 0.0 {
            return;
        }

        let scale = rect.area();
        let mut items: Vec<(usize, f64)> = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0)
            .map(|(i, &w)| (i, share(u128::from(w), total, scale)))
            .collect();
        // Stable sort keeps equal weights in their original order.
        items.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut free = rect;
        let mut start = 0;
        while start < items.len() {
            let short = free.width().min(free.height());
            let mut end = start + 1;
            while end < items.len()
                && worst(&items[start..=end], short) <= worst(&items[start..end], short)
            {
                end += 1;
            }
            let is_last_row = end == items.len();
            free = place_row(&items[start..end], free, is_last_row, out);
            start = end;
        }
    }
}

/// The tilings available at runtime, for hosts that choose one from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TilingKind {
    /// See [`SliceAndDice`].
    #[default]
    SliceAndDice,
    /// See [`Squarified`].
    Squarified,
}

impl Tiling for TilingKind {
    fn tile(&self, rect: Rect, weights: &[u64], out: &mut Vec<Rect>) {
        match self {
            Self::SliceAndDice => SliceAndDice.tile(rect, weights, out),
            Self::Squarified => Squarified.tile(rect, weights, out),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Shares only need f64 precision; the exact remainder goes to the last child."
)]
fn share(part: u128, total: u128, of: f64) -> f64 {
    // Multiply first so that exact shares of integral lengths stay exact.
    part as f64 * of / total as f64
}

fn empty_at(x: f64, y: f64) -> Rect {
    Rect::new(x, y, x, y)
}

/// Worst aspect ratio of a row of `areas` laid along a side of length `short`.
fn worst(row: &[(usize, f64)], short: f64) -> f64 {
    let sum: f64 = row.iter().map(|&(_, a)| a).sum();
    let (min, max) = row
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &(_, a)| (lo.min(a), hi.max(a)));
    let s2 = short * short;
    let sum2 = sum * sum;
    (s2 * max / sum2).max(sum2 / (s2 * min))
}

/// Lay `row` against the shorter side of `free` and return the space left over.
fn place_row(row: &[(usize, f64)], free: Rect, is_last_row: bool, out: &mut [Rect]) -> Rect {
    let sum: f64 = row.iter().map(|&(_, a)| a).sum();
    if free.width() >= free.height() {
        // Column on the left edge.
        let thickness = if is_last_row {
            free.width()
        } else {
            sum / free.height()
        };
        let x1 = free.x0 + thickness;
        let mut y = free.y0;
        for (n, &(i, area)) in row.iter().enumerate() {
            let y1 = if n + 1 == row.len() {
                free.y1
            } else {
                y + area / thickness
            };
            out[i] = Rect::new(free.x0, y, x1, y1);
            y = y1;
        }
        Rect::new(x1, free.y0, free.x1, free.y1)
    } else {
        // Row along the top edge.
        let thickness = if is_last_row {
            free.height()
        } else {
            sum / free.width()
        };
        let y1 = free.y0 + thickness;
        let mut x = free.x0;
        for (n, &(i, area)) in row.iter().enumerate() {
            let x1 = if n + 1 == row.len() {
                free.x1
            } else {
                x + area / thickness
            };
            out[i] = Rect::new(x, free.y0, x1, y1);
            x = x1;
        }
        Rect::new(free.x0, y1, free.x1, free.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn tiled(tiling: impl Tiling, rect: Rect, weights: &[u64]) -> Vec<Rect> {
        let mut out = Vec::new();
        tiling.tile(rect, weights, &mut out);
        assert_eq!(out.len(), weights.len());
        out
    }

    #[test]
    fn slice_and_dice_splits_longer_side_and_floors() {
        let rects = tiled(
            SliceAndDice,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            &[1, 1, 1],
        );
        assert_eq!(
            rects,
            vec![
                Rect::new(0.0, 0.0, 33.0, 50.0),
                Rect::new(33.0, 0.0, 66.0, 50.0),
                Rect::new(66.0, 0.0, 100.0, 50.0),
            ]
        );
    }

    #[test]
    fn slice_and_dice_square_splits_vertically() {
        let rects = tiled(SliceAndDice, Rect::new(0.0, 0.0, 10.0, 10.0), &[3, 7]);
        assert_eq!(
            rects,
            vec![Rect::new(0.0, 0.0, 10.0, 3.0), Rect::new(0.0, 3.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn slice_and_dice_remainder_skips_trailing_zero_weights() {
        let rects = tiled(
            SliceAndDice,
            Rect::new(10.0, 0.0, 110.0, 20.0),
            &[1, 2, 0],
        );
        assert_eq!(rects[0], Rect::new(10.0, 0.0, 43.0, 20.0));
        assert_eq!(rects[1], Rect::new(43.0, 0.0, 110.0, 20.0));
        assert_eq!(rects[2].area(), 0.0);
    }

    #[test]
    fn all_zero_weights_produce_empty_rects() {
        for rects in [
            tiled(SliceAndDice, Rect::new(0.0, 0.0, 10.0, 10.0), &[0, 0]),
            tiled(Squarified, Rect::new(0.0, 0.0, 10.0, 10.0), &[0, 0]),
        ] {
            assert!(rects.iter().all(|r| r.area() == 0.0));
        }
    }

    #[test]
    fn squarified_reference_example() {
        // The example from the squarified treemap paper: 6×4 with areas 6,6,4,3,2,2,1.
        let rects = tiled(
            Squarified,
            Rect::new(0.0, 0.0, 6.0, 4.0),
            &[6, 6, 4, 3, 2, 2, 1],
        );
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 3.0, 2.0));
        assert_eq!(rects[1], Rect::new(0.0, 2.0, 3.0, 4.0));
        for (r, w) in rects.iter().zip([6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0]) {
            assert!((r.area() - w).abs() < 1e-9, "{r:?} should have area {w}");
        }
        // Everything stays inside the parent.
        for r in &rects {
            assert!(r.x0 >= 0.0 && r.y0 >= 0.0 && r.x1 <= 6.0 + 1e-9 && r.y1 <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn squarified_keeps_input_order_and_zero_weights() {
        let rects = tiled(Squarified, Rect::new(0.0, 0.0, 100.0, 100.0), &[1, 0, 3]);
        assert_eq!(rects[1].area(), 0.0);
        assert!((rects[0].area() - 2500.0).abs() < 1e-9);
        assert!((rects[2].area() - 7500.0).abs() < 1e-9);
    }

    #[test]
    fn tiling_kind_dispatches() {
        let rect = Rect::new(0.0, 0.0, 30.0, 20.0);
        let weights = [5, 1, 1];
        assert_eq!(
            tiled(TilingKind::SliceAndDice, rect, &weights),
            tiled(SliceAndDice, rect, &weights)
        );
        assert_eq!(
            tiled(TilingKind::Squarified, rect, &weights),
            tiled(Squarified, rect, &weights)
        );
    }
}
