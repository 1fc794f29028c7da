// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Treemap Data: build [`treemap_tree::Tree`]s from real datasets.
//!
//! - [`population`]: world population by region and country, from saved
//!   World Bank API responses. Paths read `World -> Region -> Country`.
//! - [`fetch`]: the same responses downloaded live from the World Bank API.
//! - [`filesystem`]: a directory tree weighted by file size. Paths read
//!   `root/dir/file`.
//!
//! Loaders report progress through `tracing` and fail with [`DataError`].

pub mod error;
pub mod fetch;
pub mod filesystem;
pub mod population;

pub use error::{DataError, DataResult};
