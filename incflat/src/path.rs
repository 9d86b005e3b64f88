//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::env;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Warning};

/// Newline separated lines of a file, without the terminating `\n`.
pub type Lines = io::Split<BufReader<File>>;

/// Directory holding the running executable; the input file is resolved
/// against it unless another directory is given.
pub fn program_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    Ok(parent_dir(&exe))
}

/// Resolves the root input file to its canonical identity.
pub fn resolve_input(base: &Path, input: &Path) -> Result<PathBuf> {
    let joined = base.join(input);
    fs::canonicalize(&joined).map_err(|source| Error::PathResolution {
        path: joined,
        source,
    })
}

/// Canonicalizes an included path, falling back to the path as given.
///
/// The fallback can give one file two identities if it is included under
/// different spellings.
pub fn canonicalize_or_warn<W: Write>(path: PathBuf, diagnostics: &mut W) -> io::Result<PathBuf> {
    match fs::canonicalize(&path) {
        Ok(canonical) => Ok(canonical),
        Err(source) => {
            Warning::Canonicalize {
                path: path.clone(),
                source,
            }
            .report(diagnostics)?;
            Ok(path)
        }
    }
}

pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

pub fn open_lines(path: &Path) -> io::Result<Lines> {
    let file = File::open(path)?;
    Ok(BufReader::new(file).split(b'\n'))
}
