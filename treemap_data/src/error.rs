// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loader errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a dataset.
#[derive(Error, Debug)]
pub enum DataError {
    /// A file could not be read.
    #[error("read {}: {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A file was not valid JSON of the expected shape.
    #[error("parse {}: {source}", path.display())]
    Json {
        /// The file.
        path: PathBuf,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A directory entry could not be visited.
    #[error("walk {}: {source}", path.display())]
    Walk {
        /// The entry, or the walk root when the entry is unknown.
        path: PathBuf,
        /// The walk failure.
        #[source]
        source: walkdir::Error,
    },

    /// A JSON document parsed but did not look like an API response.
    #[error("unexpected response in {}: {reason}", path.display())]
    Format {
        /// The file.
        path: PathBuf,
        /// What was wrong.
        reason: String,
    },

    /// A request to a remote API failed.
    #[error("fetch {url}: {source}")]
    Http {
        /// The request.
        url: String,
        /// The transport failure.
        #[source]
        source: reqwest::Error,
    },

    /// A remote API answered with something other than `200 OK`.
    #[error("fetch {url}: HTTP {status}")]
    Status {
        /// The request.
        url: String,
        /// The status code.
        status: u16,
    },

    /// A dataset produced nothing to show.
    #[error("no data in {}", .0.display())]
    Empty(PathBuf),
}

/// Result type for loaders.
pub type DataResult<T> = Result<T, DataError>;
