// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::TilingChoice;

/// Explore a treemap: select leaves, delete them, grow and shrink them
#[derive(Parser, Debug)]
#[command(name = "treemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// View configuration (TOML)
    #[arg(long, global = true, env = "TREEMAP_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Canvas height in pixels, status line included
    #[arg(long, global = true)]
    pub height: Option<u32>,

    /// Tiling policy
    #[arg(long, value_enum, global = true)]
    pub tiling: Option<TilingChoice>,

    /// Seed for leaf colours
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Event script to run, one command per line
    #[arg(long, global = true, value_hint = ValueHint::FilePath, conflicts_with = "interactive")]
    pub script: Option<PathBuf>,

    /// Read commands from stdin
    #[arg(short, long, global = true)]
    pub interactive: bool,

    /// Write the final frame as SVG
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub svg: Option<PathBuf>,

    /// Print every tile of the final layout
    #[arg(long, global = true)]
    pub list: bool,

    /// Dataset to show
    #[command(subcommand)]
    pub command: Commands,
}

/// Datasets.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// World population by region and country, from the World Bank API
    Population {
        /// Saved country list response (`/v2/country?format=json`)
        #[arg(long, value_hint = ValueHint::FilePath, requires = "populations")]
        regions: Option<PathBuf>,

        /// Saved population response (`/v2/country/all/indicator/SP.POP.TOTL?format=json`)
        #[arg(long, value_hint = ValueHint::FilePath, requires = "regions")]
        populations: Option<PathBuf>,

        /// Download both responses from the live API instead
        #[arg(long, conflicts_with_all = ["regions", "populations"], required_unless_present = "regions")]
        fetch: bool,

        /// Year of the population figures when fetching [default: 2014]
        #[arg(long, requires = "fetch")]
        year: Option<u16>,
    },

    /// A directory tree weighted by file size
    Files {
        /// Directory (or file) to show
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_population_with_globals() {
        let cli = Cli::parse_from([
            "treemap",
            "-dd",
            "population",
            "--regions",
            "r.json",
            "--populations",
            "p.json",
            "--svg",
            "out.svg",
        ]);
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(
            cli.command,
            Commands::Population {
                regions: Some("r.json".into()),
                populations: Some("p.json".into()),
                fetch: false,
                year: None,
            }
        );
    }

    #[test]
    fn population_needs_files_or_fetch() {
        let cli = Cli::parse_from(["treemap", "population", "--fetch", "--year", "2020"]);
        assert!(matches!(
            cli.command,
            Commands::Population {
                fetch: true,
                year: Some(2020),
                regions: None,
                ..
            }
        ));

        for args in [
            &["treemap", "population"][..],
            &["treemap", "population", "--regions", "r.json"],
            &["treemap", "population", "--fetch", "--regions", "r.json", "--populations", "p.json"],
            &["treemap", "population", "--year", "2020", "--regions", "r.json", "--populations", "p.json"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn script_and_interactive_conflict() {
        let res = Cli::try_parse_from(["treemap", "--script", "s.txt", "-i", "files", "."]);
        assert!(res.is_err());
    }
}
