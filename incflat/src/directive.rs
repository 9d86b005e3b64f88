//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Recognition of `#include "path"` lines.

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::char,
    combinator::opt,
    sequence::{preceded, terminated},
    IResult,
};

/// Prefix a line must start with, without leading whitespace, to be an include.
pub const INCLUDE_PREFIX: &str = "#include \"";

/// Any output line containing this text is dropped during emission.
pub const INCLUDE_MARKER: &[u8] = b"#include";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// A well formed directive naming a path relative to the including file
    Include(&'a str),
    /// Starts with the include prefix but the path is unterminated or empty
    Malformed,
    /// Anything else
    Text,
}

fn include_directive(input: &str) -> IResult<&str, Option<&str>> {
    preceded(
        tag(INCLUDE_PREFIX),
        opt(terminated(take_until("\""), char('"'))),
    )(input)
}

/// Classifies one line of input. Text after the closing quote is ignored.
pub fn parse_line(line: &str) -> Directive<'_> {
    match include_directive(line) {
        Ok((_, Some(path))) if !path.is_empty() => Directive::Include(path),
        Ok(_) => Directive::Malformed,
        Err(_) => Directive::Text,
    }
}

/// Broad emission filter: true if `#include` appears anywhere in the line,
/// whether or not it forms a valid directive.
pub fn is_stripped(line: &[u8]) -> bool {
    line.windows(INCLUDE_MARKER.len())
        .any(|window| window == INCLUDE_MARKER)
}
