// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, mutation with ancestor-sum upkeep, queries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::{NodeId, Resize, Rgb};

/// Separator used by [`Tree::path`] unless overridden with [`Tree::with_separator`].
pub const DEFAULT_SEPARATOR: &str = " -> ";

/// A weighted region tree.
///
/// Every node has a name, a value, a colour, and an ordered list of children.
/// A node with children always has a value equal to the sum of its children's
/// values; mutations go through [`Tree::insert`], [`Tree::remove_leaf`],
/// [`Tree::resize`], and [`Tree::set_value`], which keep every ancestor sum up to
/// date before returning.
///
/// The tree always has exactly one root, created by [`Tree::new`]. The root is
/// never removed.
///
/// ## Example
///
/// ```rust
/// use treemap_tree::{Resize, Tree};
///
/// let mut tree = Tree::new("World");
/// let root = tree.root();
/// let europe = tree.insert(root, "Europe", 0).unwrap();
/// let france = tree.insert(europe, "France", 600).unwrap();
/// let _spain = tree.insert(europe, "Spain", 400).unwrap();
/// assert_eq!(tree.value(root), Some(1000));
///
/// tree.resize(france, Resize::Grow);
/// assert_eq!(tree.value(france), Some(606));
/// assert_eq!(tree.value(root), Some(1006));
///
/// assert_eq!(tree.remove_leaf(france), Some(606));
/// assert_eq!(tree.value(root), Some(400));
/// assert!(!tree.is_alive(france));
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    separator: String,
    colour_seed: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.len();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    name: String,
    value: u64,
    colour: Rgb,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Tree {
    /// Create a tree containing only a root named `root_name` with value 0.
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
            separator: String::from(DEFAULT_SEPARATOR),
            colour_seed: 0,
        };
        tree.root = tree.alloc(root_name.into(), 0, None);
        tree
    }

    /// Use `separator` between names in [`Tree::path`].
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Derive node colours from `seed` and recolour every live node.
    ///
    /// Colours depend only on the seed and the node's identifier, so two trees
    /// built the same way with the same seed are coloured identically.
    #[must_use]
    pub fn with_colour_seed(mut self, seed: u64) -> Self {
        self.colour_seed = seed;
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            if let Some(node) = slot {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "NodeId uses 32-bit indices by design."
                )]
                let id = NodeId::new(idx as u32, node.generation);
                node.colour = colour_for(seed, id);
            }
        }
        self
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The separator used by [`Tree::path`].
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append a child named `name` with `value` under `parent`.
    ///
    /// If `parent` was a leaf, it becomes an internal node and its own value is
    /// replaced by the sum of its children. Every ancestor is updated.
    ///
    /// Returns `None` (and changes nothing) if `parent` is stale.
    pub fn insert(&mut self, parent: NodeId, name: impl Into<String>, value: u64) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let (was_leaf, own) = {
            let p = self.node(parent);
            (p.children.is_empty(), p.value)
        };
        if was_leaf && own > 0 {
            self.sub_upward(parent, own);
        }
        let id = self.alloc(name.into(), value, Some(parent));
        self.node_mut(parent).children.push(id);
        self.add_upward(parent, value);
        Some(id)
    }

    /// Remove the leaf `id` and return its value.
    ///
    /// Every ancestor's value drops by the removed value. Ancestors left without
    /// children are removed too, up to (but never including) the root.
    ///
    /// Returns `None` (and changes nothing) if `id` is stale, is the root, or has
    /// children.
    pub fn remove_leaf(&mut self, id: NodeId) -> Option<u64> {
        if !self.is_alive(id) || id == self.root || !self.node(id).children.is_empty() {
            return None;
        }
        let value = self.node(id).value;
        let parent = self.node(id).parent?;
        self.unlink(id, parent);
        self.free(id);
        self.sub_upward(parent, value);

        let mut current = parent;
        while current != self.root && self.node(current).children.is_empty() {
            let Some(up) = self.node(current).parent else {
                break;
            };
            self.unlink(current, up);
            self.free(current);
            current = up;
        }
        Some(value)
    }

    /// Grow or shrink the leaf `id` by one [`Resize`] step and return its new value.
    ///
    /// A step is 1% of the current value, rounded up. Shrinking never takes the
    /// value below 1; a shrink that would is ignored and the unchanged value is
    /// returned. Growing saturates at `u64::MAX`.
    ///
    /// Returns `None` (and changes nothing) if `id` is stale or has children.
    pub fn resize(&mut self, id: NodeId, step: Resize) -> Option<u64> {
        if !self.is_leaf(id) {
            return None;
        }
        let value = self.node(id).value;
        let amount = Resize::step(value);
        match step {
            Resize::Grow => {
                let grown = value.saturating_add(amount);
                self.set_leaf_value(id, grown);
                Some(grown)
            }
            Resize::Shrink if value > amount => {
                let shrunk = value - amount;
                self.set_leaf_value(id, shrunk);
                Some(shrunk)
            }
            Resize::Shrink => Some(value),
        }
    }

    /// Set the value of the leaf `id`, returning the previous value.
    ///
    /// Returns `None` (and changes nothing) if `id` is stale or has children.
    pub fn set_value(&mut self, id: NodeId, value: u64) -> Option<u64> {
        if !self.is_leaf(id) {
            return None;
        }
        let old = self.node(id).value;
        self.set_leaf_value(id, value);
        Some(old)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns true if `id` is live and has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.node(id).children.is_empty()
    }

    /// The value of a live node.
    pub fn value(&self, id: NodeId) -> Option<u64> {
        self.get(id).map(|n| n.value)
    }

    /// The name of a live node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name.as_str())
    }

    /// The colour of a live node.
    pub fn colour(&self, id: NodeId) -> Option<Rgb> {
        self.get(id).map(|n| n.colour)
    }

    /// Override the colour of a live node. Returns `false` for stale ids.
    pub fn set_colour(&mut self, id: NodeId, colour: Rgb) -> bool {
        match self.get_mut(id) {
            Some(n) => {
                n.colour = colour;
                true
            }
            None => false,
        }
    }

    /// Returns the parent of a node if live, or `None` for the root or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Iterate the ancestors of `id`, nearest first, ending with the root.
    ///
    /// Yields nothing for the root or stale ids.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// The names from the root down to `id`, joined by [`Tree::separator`].
    ///
    /// Returns `None` for stale ids.
    pub fn path(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        let mut names: Vec<&str> = self
            .ancestors(id)
            .filter_map(|a| self.name(a))
            .collect();
        names.reverse();
        names.push(&node.name);
        Some(names.join(&self.separator))
    }

    /// The leaves with a non-zero value, in depth-first order.
    ///
    /// This is the order in which a treemap emits its tiles.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.value == 0 {
                continue;
            }
            if node.children.is_empty() {
                out.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Get the next node in depth-first (pre-order) traversal.
    ///
    /// Returns `None` after the last node or if `current` is stale.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            let siblings = &self.node(parent).children;
            if let Some(pos) = siblings.iter().position(|&s| s == node)
                && let Some(&next) = siblings.get(pos + 1)
            {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    // --- internals ---

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn alloc(&mut self, name: String, value: u64, parent: Option<NodeId>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(idx as u32, generation);
        self.nodes[idx] = Some(Node {
            generation,
            name,
            value,
            colour: colour_for(self.colour_seed, id),
            parent,
            children: Vec::new(),
        });
        id
    }

    fn free(&mut self, id: NodeId) {
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn unlink(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|&c| c != id);
    }

    fn set_leaf_value(&mut self, id: NodeId, value: u64) {
        let old = core::mem::replace(&mut self.node_mut(id).value, value);
        if let Some(parent) = self.node(id).parent {
            if value > old {
                self.add_upward(parent, value - old);
            } else {
                self.sub_upward(parent, old - value);
            }
        }
    }

    /// Add `amount` to `from` and every ancestor of `from`.
    fn add_upward(&mut self, from: NodeId, amount: u64) {
        let mut current = Some(from);
        while let Some(id) = current {
            let n = self.node_mut(id);
            n.value = n.value.saturating_add(amount);
            current = n.parent;
        }
    }

    /// Subtract `amount` from `from` and every ancestor of `from`.
    fn sub_upward(&mut self, from: NodeId, amount: u64) {
        let mut current = Some(from);
        while let Some(id) = current {
            let n = self.node_mut(id);
            n.value = n.value.saturating_sub(amount);
            current = n.parent;
        }
    }
}

fn colour_for(seed: u64, id: NodeId) -> Rgb {
    Rgb::from_seed(seed ^ ((u64::from(id.1) << 32) | u64::from(id.0)))
}

/// Iterator over the ancestors of a node, returned by [`Tree::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.parent_of(id);
        Some(id)
    }
}
