//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Discovery pass: finds every file reachable from the root through include
//! directives and records the deepest depth each one was reached at.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::config::Config;
use crate::depth_map::{DepthMap, Visit};
use crate::directive::{parse_line, Directive};
use crate::error::{Error, Result, Warning};
use crate::path::{canonicalize_or_warn, open_lines, parent_dir, Lines};

/// A file being scanned. Owns the open handle, which is closed when the
/// frame is popped or unwound.
struct Frame {
    file: PathBuf,
    base_dir: PathBuf,
    depth: usize,
    lines: Lines,
    line_no: usize,
    misses: usize,
}

impl Frame {
    /// Reads up to the next include directive, returning its path. Returns
    /// `None` once the file or the scan window is exhausted.
    fn next_include<W: Write>(
        &mut self,
        config: &Config,
        diagnostics: &mut W,
    ) -> Result<Option<String>> {
        while !config.scan_exhausted(self.misses) {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line.map_err(|source| Error::Read {
                path: self.file.clone(),
                source,
            })?;
            self.line_no += 1;

            let text = String::from_utf8_lossy(&line);
            match parse_line(&text) {
                Directive::Include(path) => {
                    self.misses = 0;
                    return Ok(Some(path.to_string()));
                }
                Directive::Malformed => Warning::MalformedDirective {
                    file: self.file.clone(),
                    line: self.line_no,
                    text: text.to_string(),
                }
                .report(diagnostics)?,
                Directive::Text => self.misses += 1,
            }
        }

        trace!(
            "{}: scan window closed after line {}",
            self.file.display(),
            self.line_no
        );
        Ok(None)
    }
}

/// Include graph walker.
///
/// Traversal is depth first over an explicit stack of frames. A file reached
/// again at a strictly greater depth than recorded is scanned again so the
/// greater depth reaches its own includes too; a file reached at an equal or
/// smaller depth, or one still on the active chain, is not.
pub struct Walker<'a, W: Write> {
    config: &'a Config,
    diagnostics: &'a mut W,
    map: DepthMap,
}

impl<'a, W: Write> Walker<'a, W> {
    pub fn new(config: &'a Config, diagnostics: &'a mut W) -> Self {
        Self {
            config,
            diagnostics,
            map: DepthMap::new(),
        }
    }

    pub fn depth_map(&self) -> &DepthMap {
        &self.map
    }

    pub fn into_depth_map(self) -> DepthMap {
        self.map
    }

    /// Walks everything reachable from `root`, which sits at depth 0 and
    /// resolves its includes against its own directory.
    pub fn walk(&mut self, root: &Path) -> Result<()> {
        self.visit(root.to_path_buf(), parent_dir(root), 0)
    }

    /// Visits `file` at `depth`, resolving its includes against `base_dir`.
    ///
    /// On failure the entry of every file on the include chain leading to the
    /// failure is removed from the depth map. Files fully scanned before the
    /// failure keep their entries.
    pub fn visit(&mut self, file: PathBuf, base_dir: PathBuf, depth: usize) -> Result<()> {
        let mut stack = Vec::new();
        let result = self.traverse(file, base_dir, depth, &mut stack);

        if result.is_err() {
            for frame in stack.drain(..).rev() {
                debug!("{}: unwinding", frame.file.display());
                self.map.remove(&frame.file);
            }
        }

        result
    }

    fn traverse(
        &mut self,
        file: PathBuf,
        base_dir: PathBuf,
        depth: usize,
        stack: &mut Vec<Frame>,
    ) -> Result<()> {
        self.enter(file, base_dir, depth, stack)?;

        while let Some(frame) = stack.last_mut() {
            match frame.next_include(self.config, &mut *self.diagnostics)? {
                Some(include) => {
                    let target = frame.base_dir.join(include);
                    let depth = frame.depth + 1;

                    let target = canonicalize_or_warn(target, &mut *self.diagnostics)?;
                    let base_dir = parent_dir(&target);
                    self.enter(target, base_dir, depth, stack)?;
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        debug!("{}: done at depth {}", frame.file.display(), frame.depth);
                        self.map.mark_done(&frame.file);
                    }
                }
            }
        }

        Ok(())
    }

    /// Applies the visitation transition for `file` reached at `depth`,
    /// pushing a frame if the file has to be scanned.
    fn enter(
        &mut self,
        file: PathBuf,
        base_dir: PathBuf,
        depth: usize,
        stack: &mut Vec<Frame>,
    ) -> Result<()> {
        match self.map.get(&file) {
            Some(Visit::InProgress(active)) => {
                debug!(
                    "{}: circular include ignored (active at depth {})",
                    file.display(),
                    active
                );
                return Ok(());
            }
            Some(Visit::Done(seen)) if seen >= depth => {
                trace!("{}: already scanned at depth {}", file.display(), seen);
                return Ok(());
            }
            Some(Visit::Done(seen)) => {
                debug!(
                    "{}: depth raised from {} to {}, rescanning",
                    file.display(),
                    seen,
                    depth
                );
            }
            None => debug!("{}: entering at depth {}", file.display(), depth),
        }

        if depth > self.config.max_depth {
            return Err(Error::DepthExceeded {
                path: file,
                max_depth: self.config.max_depth,
            });
        }

        self.map.mark_in_progress(file.clone(), depth);
        match open_lines(&file) {
            Ok(lines) => {
                stack.push(Frame {
                    file,
                    base_dir,
                    depth,
                    lines,
                    line_no: 0,
                    misses: 0,
                });
                Ok(())
            }
            Err(source) => {
                self.map.remove(&file);
                Err(Error::IncludeOpen { path: file, source })
            }
        }
    }
}
