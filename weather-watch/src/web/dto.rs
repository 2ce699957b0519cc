//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, CycleStatus, DecisionResult, InvalidCoordinate, Station};

/// Query string naming a location.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Latitude in decimal degrees
    pub lat: f64,

    /// Longitude in decimal degrees
    pub lon: f64,
}

impl LocationQuery {
    pub fn coordinate(&self) -> Result<Coordinate, InvalidCoordinate> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A decision with its derived presentation fields.
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub result: DecisionResult,

    /// Triggered, clear, or no data
    pub status: CycleStatus,

    /// Distance-weighted share of positive stations
    pub weighted_signal_pct: f64,
}

impl From<DecisionResult> for DecisionResponse {
    fn from(result: DecisionResult) -> Self {
        Self {
            status: result.status(),
            weighted_signal_pct: result.weighted_signal_pct(),
            result,
        }
    }
}

/// The candidate set for a location.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub origin: Coordinate,
    pub stations: Vec<Station>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
