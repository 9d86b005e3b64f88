//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use core::fmt;
use std::io;
use std::path::PathBuf;

use gettextrs::gettext;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot resolve input file {}: {source}", .path.display())]
    PathResolution { path: PathBuf, source: io::Error },
    #[error("cannot open {}: {source}", .path.display())]
    IncludeOpen { path: PathBuf, source: io::Error },
    #[error("error reading {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("include depth exceeds {max_depth} at {}", .path.display())]
    DepthExceeded { path: PathBuf, max_depth: usize },
    #[error("cannot open output file {}: {source}", .path.display())]
    OutputOpen { path: PathBuf, source: io::Error },
    #[error("Error processing io: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions that are reported and then recovered from locally
#[derive(Debug)]
pub enum Warning {
    /// Line starts with the include prefix but has no closing quote
    MalformedDirective {
        file: PathBuf,
        line: usize,
        text: String,
    },
    /// Included path could not be canonicalized; the raw path is used instead
    Canonicalize { path: PathBuf, source: io::Error },
    /// File selected for output could not be reopened or read
    EmissionOpen { path: PathBuf, source: io::Error },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Warning::*;

        match self {
            MalformedDirective { file, line, text } => write!(
                f,
                "{}:{}: {}: {}",
                file.display(),
                line,
                gettext("malformed #include directive"),
                text
            ),
            Canonicalize { path, source } => write!(
                f,
                "{} {}: {}",
                gettext("cannot resolve canonical path for"),
                path.display(),
                source
            ),
            EmissionOpen { path, source } => write!(
                f,
                "{} {}: {}",
                gettext("skipping"),
                path.display(),
                source
            ),
        }
    }
}

impl Warning {
    /// Writes the warning as one diagnostic line.
    pub fn report<W: io::Write>(&self, diagnostics: &mut W) -> io::Result<()> {
        writeln!(diagnostics, "incflat: {}", self)
    }
}
