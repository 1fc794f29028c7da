// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `treemap` explorer.
//!
//! Loads a dataset (world population or a directory tree), lays it out as a
//! treemap and replays commands against it: primary clicks select leaves,
//! secondary clicks delete them, and Up/Down grow or shrink the selection by
//! 1%. The status line is echoed on stdout and the final frame can be written
//! as SVG.
//!
//! ```text
//! treemap files ~/src --script demo.txt --svg out.svg
//! treemap population --regions countries.json --populations pop.json -i
//! treemap population --fetch --year 2020 --list
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod script;
pub mod session;

use std::fs::{self, File};
use std::io::{self, BufReader, Write};

use tracing::{info, instrument};
use treemap_data::fetch::{DEFAULT_YEAR, WorldBank};
use treemap_data::{filesystem, population};
use treemap_tree::Tree;

use crate::cli::{Cli, Commands};
use crate::config::ViewConfig;
pub use crate::error::{AppError, AppResult};
use crate::session::Session;

/// Load the dataset named by `command`.
pub fn load_tree(command: &Commands) -> AppResult<Tree> {
    let tree = match command {
        Commands::Population {
            regions: Some(regions),
            populations: Some(populations),
            ..
        } => population::load(regions, populations)?,
        Commands::Population { year, .. } => WorldBank::new()
            .with_year(year.unwrap_or(DEFAULT_YEAR))
            .load()?,
        Commands::Files { path } => filesystem::load(path)?,
    };
    Ok(tree)
}

/// Run the explorer for a parsed command line, writing to `out`.
#[instrument(level = "debug", skip(cli, out))]
pub fn run(cli: &Cli, out: impl Write) -> AppResult<()> {
    let view = ViewConfig::resolve(cli)?;
    let tree = load_tree(&cli.command)?;
    let mut session = Session::new(tree, view, out);

    if let Some(path) = &cli.script {
        let file = File::open(path).map_err(|source| AppError::Io {
            what: format!("open {}", path.display()),
            source,
        })?;
        session.run_script(BufReader::new(file), &path.display().to_string())?;
    } else if cli.interactive {
        session.run_interactive(io::stdin().lock(), "<stdin>")?;
    }

    if cli.list {
        session.list()?;
    }

    if let Some(path) = &cli.svg {
        fs::write(path, session.frame().to_svg()).map_err(|source| AppError::Io {
            what: format!("write {}", path.display()),
            source,
        })?;
        info!(path = %path.display(), "wrote frame");
    }
    Ok(())
}
