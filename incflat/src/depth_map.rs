//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Per-file visitation state and the emission order derived from it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Visitation state of a file that has been reached at least once.
/// A file with no entry is unvisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// On the active include chain, being scanned at this depth
    InProgress(usize),
    /// Fully scanned; the deepest depth it has been reached at so far
    Done(usize),
}

impl Visit {
    pub fn depth(self) -> usize {
        match self {
            Visit::InProgress(depth) | Visit::Done(depth) => depth,
        }
    }
}

/// Map from canonical file identity to its visitation state.
///
/// A recorded depth only ever grows while an entry exists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepthMap {
    entries: BTreeMap<PathBuf, Visit>,
}

impl DepthMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, file: &Path) -> Option<Visit> {
        self.entries.get(file).copied()
    }

    pub fn depth(&self, file: &Path) -> Option<usize> {
        self.get(file).map(Visit::depth)
    }

    /// Marks `file` as being scanned at `depth`.
    pub fn mark_in_progress(&mut self, file: PathBuf, depth: usize) {
        debug_assert!(self.depth(&file).map_or(true, |old| old < depth));
        self.entries.insert(file, Visit::InProgress(depth));
    }

    /// Marks `file` as fully scanned, keeping the depth it was scanned at.
    pub fn mark_done(&mut self, file: &Path) {
        if let Some(visit) = self.entries.get_mut(file) {
            *visit = Visit::Done(visit.depth());
        }
    }

    pub fn remove(&mut self, file: &Path) -> Option<Visit> {
        self.entries.remove(file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, Visit)> {
        self.entries
            .iter()
            .map(|(path, visit)| (path.as_path(), *visit))
    }

    /// Files sorted by depth, deepest first. Files sharing a depth keep
    /// path order.
    pub fn emission_order(&self) -> Vec<PathBuf> {
        let mut files: Vec<(&PathBuf, usize)> = self
            .entries
            .iter()
            .map(|(path, visit)| (path, visit.depth()))
            .collect();
        files.sort_by(|a, b| b.1.cmp(&a.1));
        files.into_iter().map(|(path, _)| path.clone()).collect()
    }
}
