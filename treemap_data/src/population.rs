// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World Bank population data.
//!
//! Reads two responses of the World Bank API (v2, JSON format), either saved to
//! disk or fetched live through [`crate::fetch`]:
//!
//! - the country list (`/v2/country?format=json`), which names each country's
//!   region;
//! - the total population indicator (`/v2/country/all/indicator/SP.POP.TOTL?format=json`).
//!
//! Both are `[metadata, records]` arrays. The resulting tree has three levels:
//! `World`, then regions in order of first appearance, then countries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use treemap_tree::{DEFAULT_SEPARATOR, Tree};

use crate::error::{DataError, DataResult};

/// Name of the root node.
pub const WORLD: &str = "World";

/// Region the API assigns to aggregates such as "Euro area"; never shown.
pub const AGGREGATES: &str = "Aggregates";

/// A region and the countries in it, in response order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Region name, e.g. "Sub-Saharan Africa".
    pub name: String,
    /// Country names.
    pub countries: Vec<String>,
}

#[derive(Deserialize)]
struct Named {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct CountryRecord {
    name: String,
    region: Named,
}

#[derive(Deserialize)]
struct PopulationRecord {
    country: Named,
    #[serde(default)]
    value: Value,
}

/// Load the population tree from saved country and population responses.
///
/// Countries without a readable population get 0 and therefore no tile.
#[instrument(level = "debug")]
pub fn load(regions_path: &Path, populations_path: &Path) -> DataResult<Tree> {
    from_responses(
        &read(regions_path)?,
        regions_path,
        &read(populations_path)?,
        populations_path,
    )
}

/// Build the population tree from the text of both responses.
///
/// `regions_origin` and `populations_origin` name the sources in errors: file
/// paths for saved responses, URLs for fetched ones. A country list with no
/// regions is [`DataError::Empty`].
pub fn from_responses(
    regions_json: &str,
    regions_origin: &Path,
    populations_json: &str,
    populations_origin: &Path,
) -> DataResult<Tree> {
    let regions = parse_regions(regions_json, regions_origin)?;
    if regions.is_empty() {
        return Err(DataError::Empty(regions_origin.to_path_buf()));
    }
    let populations = parse_populations(populations_json, populations_origin)?;
    let tree = build_tree(&regions, &populations);
    info!(
        regions = regions.len(),
        countries = tree.leaves().len(),
        population = tree.value(tree.root()),
        "loaded population data"
    );
    Ok(tree)
}

/// Group the countries of a country-list response by region.
///
/// Regions appear in the order they are first seen; [`AGGREGATES`] is dropped.
/// `origin` names the source in errors.
pub fn parse_regions(json: &str, origin: &Path) -> DataResult<Vec<Region>> {
    let mut regions: Vec<Region> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for record in records(json, origin)? {
        let country: CountryRecord = match serde_json::from_value(record) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "skipping malformed country record");
                continue;
            }
        };
        let region = country.region.value.trim();
        if region.is_empty() || region == AGGREGATES {
            continue;
        }
        let slot = *slots.entry(region.to_owned()).or_insert_with(|| {
            regions.push(Region {
                name: region.to_owned(),
                countries: Vec::new(),
            });
            regions.len() - 1
        });
        regions[slot].countries.push(country.name.trim().to_owned());
    }
    Ok(regions)
}

/// Map country names to populations from an indicator response.
///
/// Values may be JSON numbers, numeric strings or `null`; anything that does not
/// read as a non-negative number is ignored. Fractions are truncated.
pub fn parse_populations(json: &str, origin: &Path) -> DataResult<HashMap<String, u64>> {
    let mut out = HashMap::new();
    for record in records(json, origin)? {
        let Ok(record) = serde_json::from_value::<PopulationRecord>(record) else {
            continue;
        };
        match population_value(&record.value) {
            Some(v) => {
                out.insert(record.country.value.trim().to_owned(), v);
            }
            None if record.value.is_null() => {}
            None => debug!(country = %record.country.value, value = %record.value, "unreadable population"),
        }
    }
    Ok(out)
}

/// Assemble `World` → regions → countries.
pub fn build_tree(regions: &[Region], populations: &HashMap<String, u64>) -> Tree {
    let mut tree = Tree::new(WORLD).with_separator(DEFAULT_SEPARATOR);
    let root = tree.root();
    for region in regions {
        let Some(node) = tree.insert(root, region.name.as_str(), 0) else {
            continue;
        };
        for country in &region.countries {
            let population = populations.get(country).copied().unwrap_or_else(|| {
                debug!(%country, "no population");
                0
            });
            tree.insert(node, country.as_str(), population);
        }
    }
    if tree.value(root) == Some(0) {
        warn!("population data has no non-zero values");
    }
    tree
}

fn read(path: &Path) -> DataResult<String> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The records of a `[metadata, records]` response.
fn records(json: &str, origin: &Path) -> DataResult<Vec<Value>> {
    let doc: Value = serde_json::from_str(json).map_err(|source| DataError::Json {
        path: origin.to_path_buf(),
        source,
    })?;
    let format_error = |reason: String| DataError::Format {
        path: origin.to_path_buf(),
        reason,
    };
    let Value::Array(mut parts) = doc else {
        return Err(format_error("expected a [metadata, records] array".into()));
    };
    // Errors come back as a single-element array holding a message object.
    if parts.len() == 1 {
        let message = parts[0]
            .pointer("/message/0/value")
            .and_then(Value::as_str)
            .unwrap_or("response has no records");
        return Err(format_error(message.to_owned()));
    }
    match parts.get_mut(1).map(Value::take) {
        Some(Value::Array(records)) => Ok(records),
        Some(Value::Null) => Ok(Vec::new()),
        _ => Err(format_error("expected a [metadata, records] array".into())),
    }
}

fn population_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Populations are whole numbers; fractional parts are dropped."
)]
fn whole(v: f64) -> Option<u64> {
    (v.is_finite() && v >= 0.0).then_some(v as u64)
}
