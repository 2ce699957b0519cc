//! Station catalog HTTP client.
//!
//! The catalog is a GeoJSON `FeatureCollection`. Entries are parsed one
//! at a time so a malformed station is skipped rather than failing the
//! whole fetch.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Coordinate, Station};
use crate::http::{self, UserAgent};

use super::directory::StationSource;
use super::error::StationError;

/// Upper bound on catalog pages followed in one fetch.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Catalog envelope. Features stay as raw JSON until parsed individually.
#[derive(Debug, Deserialize)]
struct StationCollection {
    features: Vec<serde_json::Value>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StationFeature {
    /// Station URL; the observation endpoint hangs off it.
    id: Option<String>,
    geometry: Option<Geometry>,
    properties: StationProperties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// GeoJSON order: [longitude, latitude]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationProperties {
    station_identifier: Option<String>,
    name: Option<String>,
}

/// Configuration for the station catalog client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Identifying user agent sent with every request
    pub user_agent: UserAgent,
    /// Base URL for the API
    pub base_url: String,
    /// Extra query parameters for the catalog request (e.g. `state=MA`)
    pub query: Vec<(String, String)>,
    /// Maximum number of catalog pages to follow
    pub max_pages: usize,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl StationClientConfig {
    pub fn new(user_agent: UserAgent) -> Self {
        Self {
            user_agent,
            base_url: http::DEFAULT_BASE_URL.to_string(),
            query: Vec::new(),
            max_pages: DEFAULT_MAX_PAGES,
            connect_timeout: http::DEFAULT_CONNECT_TIMEOUT,
            timeout: http::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Add a catalog query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_max_pages(mut self, n: usize) -> Self {
        self.max_pages = n.max(1);
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, overall: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = overall;
        self
    }
}

/// Client for the station catalog endpoint.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
    query: Vec<(String, String)>,
    max_pages: usize,
}

impl StationClient {
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = http::build_client(&config.user_agent, config.connect_timeout, config.timeout)?;

        Ok(Self {
            http,
            base_url: config.base_url,
            query: config.query,
            max_pages: config.max_pages,
        })
    }

    /// Fetch the full station catalog.
    ///
    /// Follows `pagination.next` until it is absent or a page comes back
    /// empty. Entries missing an id, a name, or valid coordinates are
    /// skipped and logged; the call still succeeds with the remaining
    /// stations.
    pub async fn fetch_all(&self) -> Result<Vec<Station>, StationError> {
        let mut stations = Vec::new();
        let mut url = format!("{}/stations", self.base_url);
        let mut page = 0;

        loop {
            let mut request = self.http.get(&url);
            if page == 0 {
                request = request.query(&self.query);
            }
            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(StationError::Api {
                    status: status.as_u16(),
                    message: http::truncate_body(&body),
                });
            }

            let body = response.text().await?;
            let (mut parsed, next) = parse_catalog(&body, &self.base_url)?;
            debug!(page, count = parsed.len(), "Parsed station catalog page");
            let page_was_empty = parsed.is_empty();
            stations.append(&mut parsed);
            page += 1;

            let Some(next_url) = next.filter(|n| !n.is_empty() && *n != url) else {
                break;
            };
            if page_was_empty {
                break;
            }
            if page >= self.max_pages {
                warn!(
                    pages = page,
                    stations = stations.len(),
                    next = %next_url,
                    "Station catalog page limit reached, remaining pages not fetched"
                );
                break;
            }
            url = next_url;
        }

        Ok(stations)
    }
}

impl StationSource for StationClient {
    async fn fetch_all_stations(&self) -> Result<Vec<Station>, StationError> {
        self.fetch_all().await
    }
}

/// Parse one catalog page, returning the stations and the next page URL.
fn parse_catalog(
    body: &str,
    base_url: &str,
) -> Result<(Vec<Station>, Option<String>), StationError> {
    let collection: StationCollection =
        serde_json::from_str(body).map_err(|e| StationError::Json {
            message: e.to_string(),
        })?;

    let stations = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| match parse_feature(raw, base_url) {
            Ok(station) => Some(station),
            Err(reason) => {
                warn!(index, reason = %reason, "Skipping malformed catalog entry");
                None
            }
        })
        .collect();

    let next = collection.pagination.and_then(|p| p.next);
    Ok((stations, next))
}

/// Parse a single feature into a station, or explain why it was skipped.
fn parse_feature(raw: serde_json::Value, base_url: &str) -> Result<Station, String> {
    let feature: StationFeature = serde_json::from_value(raw).map_err(|e| e.to_string())?;

    let id = feature
        .properties
        .station_identifier
        .filter(|s| !s.trim().is_empty())
        .ok_or("missing station identifier")?;

    let name = feature
        .properties
        .name
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| format!("station {id}: missing name"))?;

    let coordinates = feature
        .geometry
        .map(|g| g.coordinates)
        .ok_or_else(|| format!("station {id}: missing geometry"))?;

    let &[longitude, latitude, ..] = coordinates.as_slice() else {
        return Err(format!("station {id}: expected [lon, lat] coordinates"));
    };

    let coordinate =
        Coordinate::new(latitude, longitude).map_err(|e| format!("station {id}: {e}"))?;

    let station_url = feature
        .id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("{base_url}/stations/{id}"));
    let endpoint = format!(
        "{}/observations/latest",
        station_url.trim_end_matches('/')
    );

    Ok(Station::new(id, name, coordinate, endpoint))
}
