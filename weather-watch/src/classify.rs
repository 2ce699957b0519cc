//! Observation Classifier: does one observation signal rain or freeze?
//!
//! These are pure, total functions. A missing field fails only the
//! condition that needs it.

use crate::domain::{ClassificationResult, Observation};

/// Precipitation in the last hour above which a station counts as raining.
pub const RAIN_PRECIPITATION_MIN_IN: f64 = 0.01;

/// Humidity above which an overcast or foggy station counts as raining.
pub const RAIN_HUMIDITY_MIN_PCT: f64 = 95.0;

/// Description substrings that indicate rain on their own.
pub const RAIN_KEYWORDS: [&str; 8] = [
    "rain",
    "shower",
    "drizzle",
    "thunderstorm",
    "precipitation",
    "precip",
    "wet",
    "mist",
];

/// Description substrings that, with high humidity, indicate rain.
const HUMID_SKY_KEYWORDS: [&str; 2] = ["overcast", "fog"];

/// Why an observation was classified as raining.
///
/// Conditions are checked in this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainSignal {
    /// Measured precipitation over the minimum.
    Precipitation,
    /// Saturated air under an overcast or foggy sky.
    HumidOvercast,
    /// The text description mentions rain.
    Description,
}

impl RainSignal {
    /// True if the classification came from text rather than measured precipitation.
    pub fn is_text_driven(self) -> bool {
        !matches!(self, RainSignal::Precipitation)
    }
}

/// The first rain condition the observation satisfies, if any.
pub fn rain_signal(obs: &Observation) -> Option<RainSignal> {
    if obs
        .precipitation_last_hour_in
        .is_some_and(|p| p > RAIN_PRECIPITATION_MIN_IN)
    {
        return Some(RainSignal::Precipitation);
    }

    let description = obs.description_lower();
    let mentions = |words: &[&str]| {
        description
            .as_deref()
            .is_some_and(|d| words.iter().any(|w| d.contains(w)))
    };

    let humid = obs
        .relative_humidity_pct
        .is_some_and(|h| h > RAIN_HUMIDITY_MIN_PCT);
    if humid && mentions(&HUMID_SKY_KEYWORDS[..]) {
        return Some(RainSignal::HumidOvercast);
    }

    if mentions(&RAIN_KEYWORDS[..]) {
        return Some(RainSignal::Description);
    }

    None
}

pub fn is_raining(obs: &Observation) -> bool {
    rain_signal(obs).is_some()
}

/// True iff a temperature is reported and it is at or below `threshold_f`.
pub fn is_freezing(obs: &Observation, threshold_f: f64) -> bool {
    obs.temperature_f.is_some_and(|t| t <= threshold_f)
}

pub fn classify(obs: &Observation, freeze_threshold_f: f64) -> ClassificationResult {
    ClassificationResult {
        is_raining: is_raining(obs),
        is_freezing: is_freezing(obs, freeze_threshold_f),
    }
}
