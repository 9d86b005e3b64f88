//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{error::ErrorKind, Parser};
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};

use incflat::{
    config::{Config, DEFAULT_MAX_DEPTH, DEFAULT_SCAN_LIMIT},
    error::Error,
    path::{program_dir, resolve_input},
    PROJECT_NAME,
};

/// incflat - flatten a tree of #include'd source files into one stream
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Resolve INPUT relative to DIRECTORY instead of the program's own directory
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,

    /// Stop scanning a file after N consecutive lines without an include directive (0 scans whole files)
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_SCAN_LIMIT)]
    scan_limit: usize,

    /// Fail when includes nest deeper than N
    #[arg(short = 'd', long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// List files in emission order instead of concatenating them
    #[arg(short, long)]
    list: bool,

    /// Root file to flatten
    input: PathBuf,

    /// File to write; standard output if omitted
    output: Option<PathBuf>,
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>, Error> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| Error::OutputOpen {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    env_logger::init();

    let args = Args::try_parse().unwrap_or_else(|err| {
        if err.kind() == ErrorKind::DisplayHelp || err.kind() == ErrorKind::DisplayVersion {
            err.exit();
        }
        eprint!("{}", err);
        process::exit(1);
    });

    let base = match &args.directory {
        Some(dir) => dir.clone(),
        None => program_dir()?,
    };

    let root = resolve_input(&base, &args.input).unwrap_or_else(|err| {
        eprintln!("incflat: {}", err);
        process::exit(1);
    });

    let config = Config {
        max_depth: args.max_depth,
        list_only: args.list,
        ..Default::default()
    }
    .with_scan_limit(args.scan_limit);

    let mut out = open_output(args.output.as_ref()).unwrap_or_else(|err| {
        eprintln!("incflat: {}", err);
        process::exit(1);
    });

    let mut stderr = io::stderr().lock();
    match incflat::run(&root, &config, &mut out, &mut stderr) {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("incflat: {}: {}", gettext("write error"), err);
            process::exit(1);
        }
    }
}
