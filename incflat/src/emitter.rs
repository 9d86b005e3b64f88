//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Emission pass: concatenates discovered files in emission order.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::directive::is_stripped;
use crate::error::{Result, Warning};
use crate::path::{open_lines, Lines};

/// Copies each file in `order` to `out` exactly once, dropping every line
/// that mentions `#include`. Files that cannot be read are reported and
/// skipped. Returns the number of files copied in full.
pub fn emit<O: Write, W: Write>(
    order: &[PathBuf],
    out: &mut O,
    diagnostics: &mut W,
) -> Result<usize> {
    let mut emitted = 0;

    for file in order {
        let lines = match open_lines(file) {
            Ok(lines) => lines,
            Err(source) => {
                Warning::EmissionOpen {
                    path: file.clone(),
                    source,
                }
                .report(diagnostics)?;
                continue;
            }
        };

        debug!("{}: emitting", file.display());
        if copy_lines(file, lines, out, diagnostics)? {
            emitted += 1;
        }
    }

    Ok(emitted)
}

fn copy_lines<O: Write, W: Write>(
    file: &Path,
    lines: Lines,
    out: &mut O,
    diagnostics: &mut W,
) -> Result<bool> {
    for line in lines {
        let line = match line {
            Ok(line) => line,
            Err(source) => {
                Warning::EmissionOpen {
                    path: file.to_path_buf(),
                    source,
                }
                .report(diagnostics)?;
                return Ok(false);
            }
        };

        if is_stripped(&line) {
            continue;
        }
        out.write_all(&line)?;
        out.write_all(b"\n")?;
    }

    Ok(true)
}

/// Writes the emission order itself, one path per line.
pub fn list<O: Write>(order: &[PathBuf], out: &mut O) -> Result<()> {
    for file in order {
        writeln!(out, "{}", file.display())?;
    }
    Ok(())
}
