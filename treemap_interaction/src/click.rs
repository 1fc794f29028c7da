// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click recognition from pointer presses and releases.
//!
//! A click is a press followed by a release of the same button. Where the two
//! land on the same target, the click always goes to that target. Where they land
//! on different targets (the pointer slid across a tile edge, or the layout
//! changed under it), the click still goes to the pressed target as long as the
//! pointer stayed within a distance threshold and the release came within a time
//! threshold.
//!
//! ```
//! use kurbo::Point;
//! use treemap_interaction::{Button, ClickResult, ClickState};
//!
//! let mut state: ClickState<u32> = ClickState::new();
//!
//! state.on_down(Button::Primary, 42, Point::new(10.0, 20.0), 1000);
//! // Released 3px away on a neighbouring target, 40ms later.
//! let result = state.on_up(Button::Primary, &7, Point::new(13.0, 20.0), 1040);
//! assert_eq!(result, ClickResult::Click(42));
//! ```
//!
//! ## Rules
//!
//! 1. Same target: always a click.
//! 2. Different targets: a click only if every configured threshold passes and
//!    no [`ClickState::on_move`] went past the distance threshold.
//! 3. Different targets with no thresholds configured: never a click.
//! 4. A release without a matching press of the same button: never a click.

use alloc::collections::BTreeMap;
use kurbo::Point;

/// Default distance, in pixels, a press may travel and still click a different target.
pub const DEFAULT_MOVE_THRESHOLD: f64 = 5.0;

/// Default time, in milliseconds, a press may last and still click a different target.
pub const DEFAULT_TIME_THRESHOLD: u64 = 100;

/// A pointer button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Button {
    /// Usually the left mouse button.
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Any other button, by platform number.
    Other(u8),
}

/// Tracks presses per button and decides which releases are clicks.
#[derive(Clone, Debug)]
pub struct ClickState<K> {
    presses: BTreeMap<Button, Press<K>>,
    /// Distance threshold for clicks across different targets; `None` for unlimited.
    pub move_threshold: Option<f64>,
    /// Time threshold in milliseconds for clicks across different targets; `None` for unlimited.
    pub time_threshold: Option<u64>,
}

/// An active press.
#[derive(Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Target under the pointer when the button went down.
    pub target: K,
    /// Pointer position when the button went down.
    pub down_position: Point,
    /// Timestamp in milliseconds when the button went down.
    pub down_time: u64,
    /// Set once the pointer travelled beyond the distance threshold.
    pub distance_exceeded: bool,
}

/// Outcome of a release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickResult<K> {
    /// A click on the pressed target.
    Click(K),
    /// No click; carries the pressed target if there was a press.
    Suppressed(Option<K>),
}

impl<K: PartialEq + Clone> ClickState<K> {
    /// Create a click state with [`DEFAULT_MOVE_THRESHOLD`] and [`DEFAULT_TIME_THRESHOLD`].
    pub fn new() -> Self {
        Self::with_thresholds(Some(DEFAULT_MOVE_THRESHOLD), Some(DEFAULT_TIME_THRESHOLD))
    }

    /// Create a click state with custom thresholds.
    ///
    /// With both thresholds `None`, only same-target releases are clicks.
    pub fn with_thresholds(move_threshold: Option<f64>, time_threshold: Option<u64>) -> Self {
        Self {
            presses: BTreeMap::new(),
            move_threshold,
            time_threshold,
        }
    }

    /// Record `button` going down over `target`.
    ///
    /// A second press of a button that is already down replaces the first.
    pub fn on_down(&mut self, button: Button, target: K, position: Point, timestamp: u64) {
        self.presses.insert(
            button,
            Press {
                target,
                down_position: position,
                down_time: timestamp,
                distance_exceeded: false,
            },
        );
    }

    /// Record `button` going up over `current_target` and decide whether it clicked.
    pub fn on_up(
        &mut self,
        button: Button,
        current_target: &K,
        position: Point,
        timestamp: u64,
    ) -> ClickResult<K> {
        let Some(press) = self.presses.remove(&button) else {
            return ClickResult::Suppressed(None);
        };

        if press.target == *current_target {
            return ClickResult::Click(press.target);
        }

        if (self.move_threshold.is_none() && self.time_threshold.is_none())
            || press.distance_exceeded
        {
            return ClickResult::Suppressed(Some(press.target));
        }

        let distance_ok = self
            .move_threshold
            .is_none_or(|t| press.down_position.distance(position) <= t);
        let time_ok = self
            .time_threshold
            .is_none_or(|t| timestamp.saturating_sub(press.down_time) <= t);

        if distance_ok && time_ok {
            ClickResult::Click(press.target)
        } else {
            ClickResult::Suppressed(Some(press.target))
        }
    }

    /// Track pointer movement while buttons are down.
    ///
    /// Returns the target of the first press that newly went past the distance
    /// threshold, if any.
    pub fn on_move(&mut self, position: Point) -> Option<K> {
        let threshold = self.move_threshold?;
        let mut newly_exceeded = None;
        for press in self.presses.values_mut() {
            if !press.distance_exceeded && press.down_position.distance(position) > threshold {
                press.distance_exceeded = true;
                if newly_exceeded.is_none() {
                    newly_exceeded = Some(press.target.clone());
                }
            }
        }
        newly_exceeded
    }

    /// Forget the press of `button`. Returns `true` if there was one.
    pub fn cancel(&mut self, button: Button) -> bool {
        self.presses.remove(&button).is_some()
    }

    /// Whether `button` is currently down.
    pub fn is_pressed(&self, button: Button) -> bool {
        self.presses.contains_key(&button)
    }

    /// The active press of `button`.
    pub fn press(&self, button: Button) -> Option<&Press<K>> {
        self.presses.get(&button)
    }

    /// Forget every press.
    pub fn clear(&mut self) {
        self.presses.clear();
    }
}

impl<K: PartialEq + Clone> Default for ClickState<K> {
    fn default() -> Self {
        Self::new()
    }
}
