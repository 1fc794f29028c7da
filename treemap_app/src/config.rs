// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View configuration.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults: a 1024×768 canvas, 30px status line in Consolas,
//!    slice-and-dice tiling.
//! 2. A TOML file given with `--config` (or `TREEMAP_CONFIG`). Missing keys
//!    keep their defaults.
//! 3. Command-line flags.

use std::path::Path;

use clap::ValueEnum;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use tracing::debug;
use treemap_layout::TilingKind;

use crate::cli::Cli;
use crate::error::{AppError, AppResult};

/// Which tiling lays out the treemap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TilingChoice {
    /// Split along the longer side, in child order.
    #[default]
    SliceAndDice,
    /// Squarified rows, largest first.
    Squarified,
}

impl From<TilingChoice> for TilingKind {
    fn from(choice: TilingChoice) -> Self {
        match choice {
            TilingChoice::SliceAndDice => Self::SliceAndDice,
            TilingChoice::Squarified => Self::Squarified,
        }
    }
}

/// Canvas, status line, tiling and click settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels, status line included.
    pub height: u32,
    /// Height of the status line at the bottom of the canvas.
    pub font_height: u32,
    /// Font family of the status line.
    pub font_family: String,
    /// Tiling policy.
    pub tiling: TilingChoice,
    /// Seed for leaf colours.
    pub colour_seed: u64,
    /// How far, in pixels, a press may slide onto another tile and still click.
    pub click_distance: f64,
    /// How long, in milliseconds, a press may last and still click another tile.
    pub click_time_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            font_height: 30,
            font_family: "Consolas".to_owned(),
            tiling: TilingChoice::SliceAndDice,
            colour_seed: 0,
            click_distance: treemap_interaction::click::DEFAULT_MOVE_THRESHOLD,
            click_time_ms: treemap_interaction::click::DEFAULT_TIME_THRESHOLD,
        }
    }
}

impl ViewConfig {
    /// Read a TOML file onto the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: format!("read: {e}"),
        })?;
        let config = Self::from_toml(&content).map_err(|e| AppError::Config {
            path: path.to_path_buf(),
            message: format!("parse: {e}"),
        })?;
        debug!(?path, ?config, "loaded view config");
        Ok(config)
    }

    /// Parse TOML onto the defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Resolve the configuration for a command line: defaults, then the file, then flags.
    pub fn resolve(cli: &Cli) -> AppResult<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Override fields with any flags given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(tiling) = cli.tiling {
            self.tiling = tiling;
        }
        if let Some(seed) = cli.seed {
            self.colour_seed = seed;
        }
    }

    /// Check that the treemap area is non-empty.
    pub fn validate(&self) -> AppResult<()> {
        if self.width == 0 {
            return Err(AppError::InvalidView("width must be positive".into()));
        }
        if self.font_height < 8 {
            return Err(AppError::InvalidView("font_height must be at least 8".into()));
        }
        if self.height <= self.font_height {
            return Err(AppError::InvalidView(format!(
                "height {} leaves no room for the treemap above a {}px status line",
                self.height, self.font_height
            )));
        }
        if self.click_distance.is_nan() || self.click_distance < 0.0 {
            return Err(AppError::InvalidView(
                "click_distance must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// The whole canvas.
    pub fn canvas(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Height of the treemap area above the status line.
    pub fn treemap_height(&self) -> u32 {
        self.height.saturating_sub(self.font_height)
    }

    /// The rectangle the treemap is laid out into.
    pub fn treemap_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.treemap_height()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_match_the_classic_window() {
        let config = ViewConfig::default();
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.treemap_height(), 738);
        assert_eq!(config.treemap_bounds(), Rect::new(0.0, 0.0, 1024.0, 738.0));
        assert_eq!(config.font_family, "Consolas");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_some_fields() {
        let config = ViewConfig::from_toml(
            r#"
            width = 640
            tiling = "squarified"
            "#,
        )
        .unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 768);
        assert_eq!(config.tiling, TilingChoice::Squarified);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ViewConfig::from_toml("colour = 3").is_err());
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.toml");
        std::fs::write(&path, "width = 640\nheight = 480\n").unwrap();
        let cli = Cli::parse_from([
            "treemap",
            "--config",
            path.to_str().unwrap(),
            "--height",
            "300",
            "--tiling",
            "squarified",
            "files",
            ".",
        ]);
        let config = ViewConfig::resolve(&cli).unwrap();
        assert_eq!((config.width, config.height), (640, 300));
        assert_eq!(config.tiling, TilingChoice::Squarified);
    }

    #[test]
    fn bad_config_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.toml");
        std::fs::write(&path, "width = \"wide\"").unwrap();
        let err = ViewConfig::load(&path).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }), "{err}");
        assert!(err.to_string().contains("view.toml"));
    }

    #[test]
    fn tiny_views_are_invalid() {
        let config = ViewConfig {
            height: 30,
            ..ViewConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidView(_))));
    }
}
