//! Conversion from observation DTOs to the domain [`Observation`].
//!
//! Quantities are converted according to their unit code. A missing or
//! unrecognised code is read as the upstream's usual unit: Celsius,
//! millimetres, and metres per second.

use tracing::trace;

use crate::domain::units::{
    celsius_to_fahrenheit, degrees_to_cardinal, kmh_to_mph, mm_to_inches, mps_to_mph,
};
use crate::domain::{Observation, Station};

use super::types::{ObservationFeature, Quantity};

/// Build a normalized observation for `station`.
///
/// Never fails: absent, null, or non-finite readings become `None`.
pub fn convert_observation(
    feature: ObservationFeature,
    station: Station,
    raw_payload: Option<String>,
) -> Observation {
    let props = feature.properties;

    let text_description = props
        .text_description
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Observation {
        temperature_f: props.temperature.as_ref().and_then(temperature_f),
        precipitation_last_hour_in: props.precipitation_last_hour.as_ref().and_then(precipitation_in),
        relative_humidity_pct: props.relative_humidity.as_ref().and_then(finite_value),
        wind_speed_mph: props.wind_speed.as_ref().and_then(wind_speed_mph),
        wind_direction_cardinal: props
            .wind_direction
            .as_ref()
            .and_then(finite_value)
            .map(|deg| degrees_to_cardinal(deg).to_string()),
        text_description,
        raw_payload,
        observed_at: props.timestamp,
        station,
    }
}

fn finite_value(q: &Quantity) -> Option<f64> {
    q.value.filter(|v| v.is_finite())
}

fn temperature_f(q: &Quantity) -> Option<f64> {
    let v = finite_value(q)?;
    Some(match q.unit() {
        Some("degF") => v,
        Some("K") => celsius_to_fahrenheit(v - 273.15),
        Some("degC") | None => celsius_to_fahrenheit(v),
        Some(other) => {
            trace!(unit = other, "Unknown temperature unit, assuming Celsius");
            celsius_to_fahrenheit(v)
        }
    })
}

fn precipitation_in(q: &Quantity) -> Option<f64> {
    let v = finite_value(q)?;
    Some(match q.unit() {
        Some("in") => v,
        Some("m") => mm_to_inches(v * 1000.0),
        Some("mm") | None => mm_to_inches(v),
        Some(other) => {
            trace!(unit = other, "Unknown precipitation unit, assuming millimetres");
            mm_to_inches(v)
        }
    })
}

fn wind_speed_mph(q: &Quantity) -> Option<f64> {
    let v = finite_value(q)?;
    Some(match q.unit() {
        Some("km_h-1") => kmh_to_mph(v),
        Some("m_s-1") | None => mps_to_mph(v),
        Some(other) => {
            trace!(unit = other, "Unknown wind speed unit, assuming m/s");
            mps_to_mph(v)
        }
    })
}
