//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Flattens a tree of files joined by `#include "path"` lines into a single
//! stream, emitting every reachable file once with the most deeply nested
//! files first.

pub mod config;
pub mod depth_map;
pub mod directive;
pub mod emitter;
pub mod error;
pub mod path;
pub mod walker;

use std::io::Write;
use std::path::Path;

use config::Config;
use error::Result;
use walker::Walker;

pub const PROJECT_NAME: &str = "incflat";

/// How a run ended once its output had been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Complete,
    /// Discovery stopped on an error; whatever had been discovered was
    /// still emitted.
    DiscoveryFailed,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Complete => 0,
            Outcome::DiscoveryFailed => 1,
        }
    }
}

/// Walks the include graph below `root`, then emits the discovered files.
///
/// `root` must already be canonical. A discovery failure is reported to
/// `diagnostics` where it happens and does not stop emission. Only a failure
/// to write `out` or `diagnostics` is returned as an error.
pub fn run<O: Write, W: Write>(
    root: &Path,
    config: &Config,
    out: &mut O,
    diagnostics: &mut W,
) -> Result<Outcome> {
    let mut walker = Walker::new(config, diagnostics);
    let walked = walker.walk(root);
    let map = walker.into_depth_map();

    let outcome = match walked {
        Ok(()) => Outcome::Complete,
        Err(error) => {
            writeln!(diagnostics, "incflat: {}", error)?;
            Outcome::DiscoveryFailed
        }
    };

    let order = map.emission_order();
    log::debug!("emitting {} files", order.len());
    if config.list_only {
        emitter::list(&order, out)?;
    } else {
        emitter::emit(&order, out, diagnostics)?;
    }
    out.flush()?;

    Ok(outcome)
}
