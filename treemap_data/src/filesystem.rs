// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directory trees.
//!
//! Files become leaves valued by their size in bytes; directories become
//! internal nodes. An empty directory is a leaf with value 0, so it has no
//! tile. Entries are visited in file-name order and symbolic links are not
//! followed (a link is a leaf valued by the size of the link itself).

use std::path::Path;

use tracing::{debug, info, instrument};
use treemap_tree::{NodeId, Tree};
use walkdir::WalkDir;

use crate::error::{DataError, DataResult};

/// Separator for paths in directory trees.
pub const SEPARATOR: &str = "/";

/// Load the tree rooted at `root`.
///
/// The root node is named after the last component of `root` (or the whole
/// path when it has none, as for `/`). When `root` is a file, the tree is that
/// single file. A tree with no bytes at all (an empty directory, or only
/// empty files) is [`DataError::Empty`].
#[instrument(level = "debug")]
pub fn load(root: &Path) -> DataResult<Tree> {
    let root_name = root
        .file_name()
        .map_or_else(|| root.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut tree = Tree::new(root_name).with_separator(SEPARATOR);

    // Directories on the path from the root to the current entry, with their depth.
    let mut open: Vec<(usize, NodeId)> = vec![(0, tree.root())];
    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| DataError::Walk {
            path: source.path().unwrap_or(root).to_path_buf(),
            source,
        })?;
        let depth = entry.depth();
        let is_dir = entry.file_type().is_dir();
        let size = if is_dir {
            0
        } else {
            entry
                .metadata()
                .map_err(|source| DataError::Walk {
                    path: entry.path().to_path_buf(),
                    source,
                })?
                .len()
        };

        if depth == 0 {
            if !is_dir {
                tree.set_value(tree.root(), size);
            }
            continue;
        }

        while open.last().is_some_and(|&(d, _)| d >= depth) {
            open.pop();
        }
        let Some(&(_, parent)) = open.last() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(node) = tree.insert(parent, name, size) else {
            continue;
        };
        if is_dir {
            open.push((depth, node));
        } else {
            debug!(path = %entry.path().display(), size, "file");
        }
    }

    if tree.value(tree.root()).unwrap_or_default() == 0 {
        return Err(DataError::Empty(root.to_path_buf()));
    }

    info!(
        root = %root.display(),
        nodes = tree.len(),
        bytes = tree.value(tree.root()),
        "loaded directory tree"
    );
    Ok(tree)
}
