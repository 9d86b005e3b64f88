//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

/// Consecutive non-include lines after which a file is no longer scanned.
pub const DEFAULT_SCAN_LIMIT: usize = 5;

/// Deepest include nesting accepted before the walk gives up.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Represents the configuration of the include flattener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Stop scanning a file once this many consecutive lines have been read
    /// without finding an include directive. `None` scans every file to its end.
    ///
    /// Include directives are expected near the top of a file. Any directive that
    /// appears after the window has closed is silently missed.
    pub scan_limit: Option<usize>,
    /// Maximum include depth, the root file being at depth 0
    pub max_depth: usize,
    /// Whether to print the emission order instead of file contents
    pub list_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan_limit: Some(DEFAULT_SCAN_LIMIT),
            max_depth: DEFAULT_MAX_DEPTH,
            list_only: false,
        }
    }
}

impl Config {
    /// Sets the scan window from its command line form, where 0 means unlimited.
    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = if limit == 0 { None } else { Some(limit) };
        self
    }

    /// Whether `misses` consecutive non-include lines close the scan window.
    pub fn scan_exhausted(&self, misses: usize) -> bool {
        self.scan_limit.is_some_and(|limit| misses >= limit)
    }
}
