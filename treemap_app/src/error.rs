// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application errors (wraps loader errors).

use std::path::PathBuf;

use thiserror::Error;
use treemap_data::DataError;

use crate::script::ParseError;

/// Everything that can stop the `treemap` binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Loading the dataset failed.
    #[error("{0}")]
    Data(#[from] DataError),

    /// The view configuration could not be read or parsed.
    #[error("config {}: {message}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The view configuration is unusable.
    #[error("invalid view: {0}")]
    InvalidView(String),

    /// An event script line could not be parsed.
    #[error("script {origin}: {source}")]
    Script {
        /// File name, or `<stdin>`.
        origin: String,
        /// The offending line.
        #[source]
        source: ParseError,
    },

    /// Reading input or writing output failed.
    #[error("{what}: {source}")]
    Io {
        /// What was being read or written.
        what: String,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
