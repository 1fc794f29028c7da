// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The treemap controller: pointer and key events in, tree edits and repaint hints out.

use alloc::format;
use alloc::string::String;

use kurbo::{Point, Rect};
use treemap_index::Backend;
use treemap_index::backends::FlatVec;
use treemap_layout::{Damage, Tiling, TilingKind, Treemap};
use treemap_tree::{NodeId, Resize, Tree};

use crate::click::{Button, ClickResult, ClickState};

/// Padding between a leaf's path and its value in the status text.
const STATUS_GAP: &str = "      ";

/// A key that was released.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Grows the selected leaf.
    Up,
    /// Shrinks the selected leaf.
    Down,
    /// Any other key; ignored.
    Other,
}

/// Host-agnostic input for a [`Visualiser`].
///
/// Timestamps are milliseconds on any monotonic clock.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    /// A pointer button went down.
    PointerDown {
        /// The button.
        button: Button,
        /// Pointer position in treemap coordinates.
        position: Point,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer position in treemap coordinates.
        position: Point,
    },
    /// A pointer button went up.
    PointerUp {
        /// The button.
        button: Button,
        /// Pointer position in treemap coordinates.
        position: Point,
        /// Timestamp in milliseconds.
        time: u64,
    },
    /// A key was released.
    Key(Key),
    /// The treemap area changed size.
    Resize(Rect),
    /// The session should end.
    Quit,
}

/// What an event changed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
    /// A leaf became the selection.
    Selected(NodeId),
    /// The selection was cleared by clicking the selected leaf.
    Deselected(NodeId),
    /// A leaf was removed from the tree.
    Deleted {
        /// The removed leaf; now stale.
        node: NodeId,
        /// Its value at removal.
        value: u64,
    },
    /// The selected leaf's value changed.
    Resized {
        /// The selected leaf.
        node: NodeId,
        /// Its value before the change.
        from: u64,
        /// Its value after the change.
        to: u64,
    },
    /// The treemap was laid out into new bounds.
    Relaid(Rect),
    /// The session ended.
    Quit,
}

/// The result of handling one event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    /// The host should repaint.
    pub redraw: bool,
    /// Treemap rectangles that changed. The status line is not included.
    pub damage: Damage,
    /// The session is over.
    pub exit: bool,
    /// What happened, if anything.
    pub action: Option<Action>,
}

impl Response {
    fn acted(action: Action, damage: Damage) -> Self {
        Self {
            redraw: true,
            damage,
            exit: false,
            action: Some(action),
        }
    }
}

/// Interactive treemap over a [`Tree`].
///
/// Owns the tree, its laid-out [`Treemap`], the current selection and the
/// status text, and applies these rules to recognised clicks on a leaf `c`
/// with selection `s`:
///
/// | button    | `c != s`                  | `c == s`                          |
/// |-----------|---------------------------|-----------------------------------|
/// | primary   | select `c`                | clear selection and status        |
/// | secondary | delete `c`, keep `s`      | delete `c`, clear selection/status |
///
/// Clicks outside every tile change nothing. With a selection, releasing
/// [`Key::Up`] grows it by one [`Resize`] step and [`Key::Down`] shrinks it.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use treemap_interaction::{Button, Key, Visualiser};
/// use treemap_layout::SliceAndDice;
/// use treemap_tree::Tree;
///
/// let mut tree = Tree::new("World");
/// let root = tree.root();
/// let europe = tree.insert(root, "Europe", 0).unwrap();
/// let france = tree.insert(europe, "France", 600).unwrap();
/// tree.insert(europe, "Spain", 400).unwrap();
///
/// let mut vis = Visualiser::new(tree, Rect::new(0.0, 0.0, 100.0, 100.0), SliceAndDice);
/// vis.click(Button::Primary, Point::new(50.0, 10.0), 0);
/// assert_eq!(vis.selected(), Some(france));
/// assert_eq!(vis.status(), "World -> Europe -> France      (600)");
///
/// vis.on_key(Key::Up);
/// assert_eq!(vis.status(), "World -> Europe -> France      (606)");
/// ```
pub struct Visualiser<L: Tiling = TilingKind, B: Backend<f64> = FlatVec<f64>> {
    tree: Tree,
    treemap: Treemap<L, B>,
    clicks: ClickState<Option<NodeId>>,
    selected: Option<NodeId>,
    status: String,
    running: bool,
}

impl<L: Tiling + core::fmt::Debug, B: Backend<f64>> core::fmt::Debug for Visualiser<L, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Visualiser")
            .field("tree", &self.tree)
            .field("treemap", &self.treemap)
            .field("selected", &self.selected)
            .field("status", &self.status)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl<L: Tiling> Visualiser<L> {
    /// Lay out `tree` into `bounds` and start a session with nothing selected.
    pub fn new(tree: Tree, bounds: Rect, tiling: L) -> Self {
        let treemap = Treemap::build(&tree, bounds, tiling);
        Self::with_treemap(tree, treemap)
    }
}

impl<L: Tiling, B: Backend<f64>> Visualiser<L, B> {
    /// Start a session over an already laid-out `treemap` of `tree`.
    pub fn with_treemap(tree: Tree, mut treemap: Treemap<L, B>) -> Self {
        treemap.rebuild(&tree);
        Self {
            tree,
            treemap,
            clicks: ClickState::new(),
            selected: None,
            status: String::new(),
            running: true,
        }
    }

    /// Replace the click recogniser, for example to change its thresholds.
    #[must_use]
    pub fn with_click_state(mut self, clicks: ClickState<Option<NodeId>>) -> Self {
        self.clicks = clicks;
        self
    }

    /// The tree being shown.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The current layout.
    pub fn treemap(&self) -> &Treemap<L, B> {
        &self.treemap
    }

    /// The selected leaf.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The status text: the selected leaf's path and value, or empty.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the session is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handle one event.
    pub fn handle(&mut self, event: Event) -> Response {
        match event {
            Event::PointerDown {
                button,
                position,
                time,
            } => {
                let target = self.treemap.leaf_at(position);
                self.clicks.on_down(button, target, position, time);
                Response::default()
            }
            Event::PointerMove { position } => {
                self.clicks.on_move(position);
                Response::default()
            }
            Event::PointerUp {
                button,
                position,
                time,
            } => {
                let target = self.treemap.leaf_at(position);
                // A release off every tile never clicks, not even the pressed leaf.
                if target.is_none() {
                    self.clicks.cancel(button);
                    return Response::default();
                }
                match self.clicks.on_up(button, &target, position, time) {
                    ClickResult::Click(Some(leaf)) => self.on_click(button, leaf),
                    _ => Response::default(),
                }
            }
            Event::Key(key) => self.on_key(key),
            Event::Resize(bounds) => self.resize(bounds),
            Event::Quit => {
                self.running = false;
                self.clicks.clear();
                Response {
                    redraw: false,
                    damage: Damage::default(),
                    exit: true,
                    action: Some(Action::Quit),
                }
            }
        }
    }

    /// Press and release `button` at `position`.
    pub fn click(&mut self, button: Button, position: Point, time: u64) -> Response {
        self.handle(Event::PointerDown {
            button,
            position,
            time,
        });
        self.handle(Event::PointerUp {
            button,
            position,
            time,
        })
    }

    /// Apply a recognised click of `button` on `leaf`.
    ///
    /// Ids that are stale or not leaves are ignored.
    pub fn on_click(&mut self, button: Button, leaf: NodeId) -> Response {
        if !self.tree.is_leaf(leaf) {
            return Response::default();
        }
        let is_selected = self.selected == Some(leaf);
        match button {
            Button::Primary if is_selected => {
                self.clear_selection();
                Response::acted(Action::Deselected(leaf), Damage::default())
            }
            Button::Primary => {
                self.selected = Some(leaf);
                self.refresh_status();
                Response::acted(Action::Selected(leaf), Damage::default())
            }
            Button::Secondary => {
                let Some(value) = self.tree.remove_leaf(leaf) else {
                    return Response::default();
                };
                if is_selected {
                    self.clear_selection();
                }
                let damage = self.treemap.rebuild(&self.tree);
                Response::acted(Action::Deleted { node: leaf, value }, damage)
            }
            Button::Other(_) => Response::default(),
        }
    }

    /// Apply a key release.
    ///
    /// Ignored without a selection.
    pub fn on_key(&mut self, key: Key) -> Response {
        let Some(node) = self.selected else {
            return Response::default();
        };
        let step = match key {
            Key::Up => Resize::Grow,
            Key::Down => Resize::Shrink,
            Key::Other => return Response::default(),
        };
        let Some(from) = self.tree.value(node) else {
            return Response::default();
        };
        let Some(to) = self.tree.resize(node, step) else {
            return Response::default();
        };
        if from == to {
            return Response::default();
        }
        self.refresh_status();
        let damage = self.treemap.rebuild(&self.tree);
        Response::acted(Action::Resized { node, from, to }, damage)
    }

    /// Lay the treemap out into `bounds`.
    pub fn resize(&mut self, bounds: Rect) -> Response {
        self.treemap.set_bounds(bounds);
        let damage = self.treemap.rebuild(&self.tree);
        self.clicks.clear();
        Response::acted(Action::Relaid(self.treemap.bounds()), damage)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.status.clear();
    }

    fn refresh_status(&mut self) {
        let status = self.selected.and_then(|id| {
            let path = self.tree.path(id)?;
            let value = self.tree.value(id)?;
            Some(format!("{path}{STATUS_GAP}({value})"))
        });
        self.status = status.unwrap_or_default();
    }
}
