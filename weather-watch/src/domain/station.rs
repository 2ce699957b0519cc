//! Weather station type.

use serde::Serialize;

use super::Coordinate;

/// A fixed weather-observing location.
///
/// Stations are created when the catalog is fetched and never mutated.
/// Ranking produces a new value carrying `distance_from_query_km`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    /// Stable identifier from the data source (e.g. "KBOS").
    pub id: String,

    /// Human-readable station name.
    pub name: String,

    /// Station location.
    pub coordinate: Coordinate,

    /// Distance from the query point, set once the station has been ranked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_query_km: Option<f64>,

    /// URL of the latest-observation endpoint for this station.
    pub observation_endpoint: String,
}

impl Station {
    /// Create an unranked station.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        observation_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            distance_from_query_km: None,
            observation_endpoint: observation_endpoint.into(),
        }
    }

    /// Return a copy of this station ranked against `origin`.
    pub fn ranked_from(&self, origin: &Coordinate) -> Self {
        Self {
            distance_from_query_km: Some(origin.distance_km(&self.coordinate)),
            ..self.clone()
        }
    }

    /// Case-insensitive substring match on the station name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
