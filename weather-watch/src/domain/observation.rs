//! Normalized station observation.

use serde::Serialize;

use super::Station;

/// The latest reading from one station, in imperial units.
///
/// Every measurement is optional: stations frequently report only a
/// subset of sensors, and a station reporting only temperature is still
/// usable for freeze decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub station: Station,
    pub temperature_f: Option<f64>,
    pub precipitation_last_hour_in: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub wind_direction_cardinal: Option<String>,
    pub text_description: Option<String>,
    #[serde(skip)]
    pub raw_payload: Option<String>,
    pub observed_at: Option<String>,
}

impl Observation {
    /// An observation with no measurements.
    pub fn empty(station: Station) -> Self {
        Self {
            station,
            temperature_f: None,
            precipitation_last_hour_in: None,
            relative_humidity_pct: None,
            wind_speed_mph: None,
            wind_direction_cardinal: None,
            text_description: None,
            raw_payload: None,
            observed_at: None,
        }
    }

    pub fn with_temperature_f(mut self, t: f64) -> Self {
        self.temperature_f = Some(t);
        self
    }

    pub fn with_precipitation_in(mut self, p: f64) -> Self {
        self.precipitation_last_hour_in = Some(p);
        self
    }

    pub fn with_humidity_pct(mut self, h: f64) -> Self {
        self.relative_humidity_pct = Some(h);
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.text_description = Some(text.into());
        self
    }

    /// Lowercased text description, if any.
    pub fn description_lower(&self) -> Option<String> {
        self.text_description.as_deref().map(str::to_lowercase)
    }
}
