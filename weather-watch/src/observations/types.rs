//! Latest-observation response DTOs.
//!
//! The endpoint returns a GeoJSON `Feature` whose `properties` carry
//! measurements as `{value, unitCode}` quantities. Stations omit sensors
//! freely and report `null` values for readings that failed quality
//! control, so nearly everything here is optional.

use serde::Deserialize;

/// Response from `<station>/observations/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationFeature {
    pub properties: ObservationProperties,
}

/// The measurements of one observation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationProperties {
    /// ISO 8601 time the observation was taken.
    pub timestamp: Option<String>,

    /// Human-readable conditions, e.g. "Light Rain and Fog/Mist".
    pub text_description: Option<String>,

    pub temperature: Option<Quantity>,

    pub precipitation_last_hour: Option<Quantity>,

    pub relative_humidity: Option<Quantity>,

    pub wind_speed: Option<Quantity>,

    /// Bearing the wind blows from, in degrees.
    pub wind_direction: Option<Quantity>,
}

/// A measured value with its unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    pub value: Option<f64>,

    /// Unit code, e.g. `wmoUnit:degC`. The namespace prefix varies.
    pub unit_code: Option<String>,
}

impl Quantity {
    /// Unit code with any `prefix:` namespace removed.
    pub fn unit(&self) -> Option<&str> {
        self.unit_code
            .as_deref()
            .map(|code| code.rsplit_once(':').map_or(code, |(_, unit)| unit))
    }
}
