//! Server settings read from the environment.
//!
//! Unset variables fall back to defaults. Values that fail to parse are
//! logged and ignored rather than aborting startup.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::warn;

use crate::engine::EngineConfig;
use crate::http;
use crate::stations::PinnedMatcher;

pub const CONTACT_VAR: &str = "WEATHER_WATCH_CONTACT";
pub const BIND_VAR: &str = "WEATHER_WATCH_BIND";
pub const BASE_URL_VAR: &str = "WEATHER_WATCH_BASE_URL";
pub const FREEZE_F_VAR: &str = "WEATHER_WATCH_FREEZE_F";
pub const RAIN_PCT_VAR: &str = "WEATHER_WATCH_RAIN_PCT";
pub const STATION_LIMIT_VAR: &str = "WEATHER_WATCH_STATION_LIMIT";
pub const PINNED_VAR: &str = "WEATHER_WATCH_PINNED";

/// Used when no contact is configured. The upstream may reject it.
const FALLBACK_CONTACT: &str = "contact-unset";

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 3000);

#[derive(Debug, Clone)]
pub struct Settings {
    /// Contact address sent in the `User-Agent`
    pub contact: String,
    pub bind: SocketAddr,
    pub base_url: String,
    pub engine: EngineConfig,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let contact = lookup(CONTACT_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                warn!("{CONTACT_VAR} not set; upstream requests may be rejected");
                FALLBACK_CONTACT.to_string()
            });

        let bind = parse_var(&lookup, BIND_VAR).unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND));

        let base_url = lookup(BASE_URL_VAR)
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| http::DEFAULT_BASE_URL.to_string());

        let mut engine = EngineConfig::default();
        if let Some(f) = parse_var(&lookup, FREEZE_F_VAR) {
            engine = engine.with_freeze_threshold_f(f);
        }
        if let Some(pct) = parse_var::<f64>(&lookup, RAIN_PCT_VAR) {
            if (0.0..=100.0).contains(&pct) {
                engine = engine.with_rain_probability_threshold(pct);
            } else {
                warn!(var = RAIN_PCT_VAR, value = pct, "Ignoring percentage outside 0-100");
            }
        }
        if let Some(limit) = parse_var(&lookup, STATION_LIMIT_VAR) {
            engine = engine.with_station_limit(limit);
        }
        if let Some(raw) = lookup(PINNED_VAR) {
            engine = engine.with_pinned(parse_pinned(&raw));
        }

        Self {
            contact,
            bind,
            base_url,
            engine,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(var = key, value = %raw, error = %e, "Ignoring unparseable setting");
            None
        }
    }
}

/// Parse a comma-separated list of pinned matchers, skipping bad entries.
fn parse_pinned(raw: &str) -> Vec<PinnedMatcher> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| match s.parse() {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                warn!(var = PINNED_VAR, error = %e, "Ignoring pinned station");
                None
            }
        })
        .collect()
}
