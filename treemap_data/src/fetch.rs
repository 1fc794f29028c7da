// Copyright 2025 the Treemap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live World Bank population data.
//!
//! Downloads the country list and the total population indicator for one year
//! and hands both to [`population::from_responses`]. Requests are blocking and
//! made one after the other.

use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, instrument};
use treemap_tree::Tree;

use crate::error::{DataError, DataResult};
use crate::population;

/// Root of the World Bank API, version 2.
pub const API_BASE: &str = "https://api.worldbank.org/v2";

/// Year of the population figures unless another is asked for.
pub const DEFAULT_YEAR: u16 = 2014;

/// Large enough for every country and aggregate in one page.
const PER_PAGE: u32 = 1000;

const TIMEOUT: Duration = Duration::from_secs(30);

/// Where and for which year to fetch population data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldBank {
    base: String,
    year: u16,
}

impl Default for WorldBank {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldBank {
    /// The public API, for [`DEFAULT_YEAR`].
    pub fn new() -> Self {
        Self {
            base: API_BASE.to_owned(),
            year: DEFAULT_YEAR,
        }
    }

    /// Fetch from another server speaking the same API.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Fetch the populations of `year`.
    #[must_use]
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = year;
        self
    }

    /// The year populations are fetched for.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The country list request.
    pub fn regions_url(&self) -> String {
        format!("{}/country?format=json&per_page={PER_PAGE}", self.base)
    }

    /// The population indicator request.
    pub fn populations_url(&self) -> String {
        format!(
            "{}/country/all/indicator/SP.POP.TOTL?format=json&date={year}:{year}&per_page={PER_PAGE}",
            self.base,
            year = self.year
        )
    }

    /// Download both responses and build the population tree.
    #[instrument(level = "debug", skip(self), fields(base = %self.base, year = self.year))]
    pub fn load(&self) -> DataResult<Tree> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|source| DataError::Http {
                url: self.base.clone(),
                source,
            })?;
        let regions_url = self.regions_url();
        let populations_url = self.populations_url();
        let regions = get(&client, &regions_url)?;
        let populations = get(&client, &populations_url)?;
        population::from_responses(
            &regions,
            Path::new(&regions_url),
            &populations,
            Path::new(&populations_url),
        )
    }
}

fn get(client: &Client, url: &str) -> DataResult<String> {
    debug!(url, "GET");
    let http_error = |source| DataError::Http {
        url: url.to_owned(),
        source,
    };
    let response = client.get(url).send().map_err(http_error)?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(DataError::Status {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }
    let body = response.text().map_err(http_error)?;
    debug!(url, bytes = body.len(), "response");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    const REGIONS: &str = r#"[{"page": 1},
        [{"name": "France", "region": {"value": "Europe & Central Asia"}},
         {"name": "Euro area", "region": {"value": "Aggregates"}},
         {"name": "Japan", "region": {"value": "East Asia & Pacific"}}]]"#;

    const POPULATIONS: &str = r#"[{"page": 1},
        [{"country": {"value": "France"}, "value": 66000000},
         {"country": {"value": "Euro area"}, "value": 338000000},
         {"country": {"value": "Japan"}, "value": "127000000"}]]"#;

    /// Answer `count` requests on a local port, one connection each, and
    /// return the request lines seen.
    fn serve(
        count: usize,
        respond: fn(&str) -> (u16, &'static str),
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/v2", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for stream in listener.incoming().take(count) {
                let mut stream = stream.unwrap();
                let mut head = Vec::new();
                let mut buf = [0_u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let head = String::from_utf8_lossy(&head).into_owned();
                let request_line = head.lines().next().unwrap_or_default().to_owned();
                let (status, body) = respond(&request_line);
                write!(
                    stream,
                    "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
                seen.push(request_line);
            }
            seen
        });
        (base, handle)
    }

    #[test]
    fn urls_name_the_year() {
        let api = WorldBank::new().with_base("http://localhost/v2/").with_year(2020);
        assert_eq!(
            api.regions_url(),
            "http://localhost/v2/country?format=json&per_page=1000"
        );
        assert_eq!(
            api.populations_url(),
            "http://localhost/v2/country/all/indicator/SP.POP.TOTL?format=json&date=2020:2020&per_page=1000"
        );
        assert_eq!(WorldBank::default().year(), DEFAULT_YEAR);
    }

    #[test]
    fn load_fetches_both_responses() {
        let (base, server) = serve(2, |request| {
            if request.contains("/indicator/") {
                (200, POPULATIONS)
            } else {
                (200, REGIONS)
            }
        });
        let tree = WorldBank::new().with_base(base).with_year(2014).load().unwrap();
        assert_eq!(tree.value(tree.root()), Some(193_000_000));
        assert_eq!(tree.children_of(tree.root()).len(), 2);

        let seen = server.join().unwrap();
        assert!(seen[0].starts_with("GET /v2/country?format=json"), "{seen:?}");
        assert!(seen[1].contains("date=2014:2014"), "{seen:?}");
    }

    #[test]
    fn error_statuses_are_reported() {
        let (base, server) = serve(1, |_| (503, "unavailable"));
        let err = WorldBank::new().with_base(base).load().unwrap_err();
        assert!(
            matches!(&err, DataError::Status { url, status: 503 } if url.contains("/country?")),
            "{err}"
        );
        server.join().unwrap();
    }

    #[test]
    fn unreachable_servers_are_http_errors() {
        // Bind then drop a listener so the port is closed.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = WorldBank::new()
            .with_base(format!("http://127.0.0.1:{port}/v2"))
            .load()
            .unwrap_err();
        assert!(matches!(err, DataError::Http { .. }), "{err}");
    }
}
