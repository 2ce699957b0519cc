//! Decision engine configuration.

use std::time::Duration;

use crate::domain::CycleKind;
use crate::http;
use crate::observations::ObservationCacheConfig;
use crate::stations::{
    DEFAULT_RELOCATION_THRESHOLD_KM, DEFAULT_STATION_LIMIT, PinnedMatcher, StationCacheConfig,
};

/// Configuration parameters for rain and freeze cycles.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// A station at or below this temperature (°F) counts as freezing.
    pub freeze_threshold_f: f64,

    /// Percentage of raining stations at which a rain cycle triggers.
    pub rain_probability_threshold: f64,

    /// Percentage of freezing stations at which a freeze cycle triggers.
    /// Independent of `freeze_threshold_f`, which only decides whether
    /// an individual station counts.
    pub freeze_majority_pct: f64,

    /// Number of nearest stations to consult.
    pub station_limit: usize,

    /// Stations always consulted regardless of distance.
    pub pinned: Vec<PinnedMatcher>,

    /// How long a candidate set is reused before the catalog is refetched.
    pub station_refresh_interval: Duration,

    /// Upper bound on a whole cycle's observation fetching.
    /// Stations that have not answered by then are dropped.
    pub cycle_deadline: Duration,

    /// Refetch candidates when the location moves further than this.
    pub relocation_threshold_km: Option<f64>,

    /// How long a fetched observation is reused across cycles.
    pub observation_ttl: Duration,

    /// Per-request connect timeout.
    pub connect_timeout: Duration,

    /// Per-request overall timeout.
    pub request_timeout: Duration,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_freeze_threshold_f(mut self, threshold: f64) -> Self {
        self.freeze_threshold_f = threshold;
        self
    }

    pub fn with_rain_probability_threshold(mut self, pct: f64) -> Self {
        self.rain_probability_threshold = pct;
        self
    }

    pub fn with_station_limit(mut self, limit: usize) -> Self {
        self.station_limit = limit;
        self
    }

    pub fn with_pinned(mut self, pinned: Vec<PinnedMatcher>) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_station_refresh_interval(mut self, interval: Duration) -> Self {
        self.station_refresh_interval = interval;
        self
    }

    pub fn with_cycle_deadline(mut self, deadline: Duration) -> Self {
        self.cycle_deadline = deadline;
        self
    }

    pub fn with_relocation_threshold_km(mut self, km: Option<f64>) -> Self {
        self.relocation_threshold_km = km;
        self
    }

    /// The value reported as `threshold_used` for a cycle.
    ///
    /// For rain this is the trigger bar; for freeze it is the
    /// per-station temperature threshold.
    pub fn threshold_for(&self, kind: CycleKind) -> f64 {
        match kind {
            CycleKind::Rain => self.rain_probability_threshold,
            CycleKind::Freeze => self.freeze_threshold_f,
        }
    }

    /// The positive percentage at or above which a cycle triggers.
    pub fn trigger_pct_for(&self, kind: CycleKind) -> f64 {
        match kind {
            CycleKind::Rain => self.rain_probability_threshold,
            CycleKind::Freeze => self.freeze_majority_pct,
        }
    }

    pub fn station_cache_config(&self) -> StationCacheConfig {
        StationCacheConfig::new(self.station_limit, self.pinned.clone())
            .with_relocation_threshold(self.relocation_threshold_km)
    }

    pub fn observation_cache_config(&self) -> ObservationCacheConfig {
        ObservationCacheConfig {
            ttl: self.observation_ttl,
            ..Default::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            freeze_threshold_f: 35.0,
            rain_probability_threshold: 50.0,
            freeze_majority_pct: 50.0,
            station_limit: DEFAULT_STATION_LIMIT,
            pinned: Vec::new(),
            station_refresh_interval: Duration::from_secs(6 * 60 * 60),
            cycle_deadline: Duration::from_secs(40),
            relocation_threshold_km: Some(DEFAULT_RELOCATION_THRESHOLD_KM),
            observation_ttl: Duration::from_secs(120),
            connect_timeout: http::DEFAULT_CONNECT_TIMEOUT,
            request_timeout: http::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.freeze_threshold_f, 35.0);
        assert_eq!(config.rain_probability_threshold, 50.0);
        assert_eq!(config.freeze_majority_pct, 50.0);
        assert_eq!(config.station_limit, 3);
        assert_eq!(config.station_refresh_interval, Duration::from_secs(21_600));
        assert_eq!(config.cycle_deadline, Duration::from_secs(40));
        assert_eq!(config.relocation_threshold_km, Some(25.0));
    }

    #[test]
    fn freeze_trigger_ignores_temperature_threshold() {
        let config = EngineConfig::new().with_freeze_threshold_f(28.0);
        assert_eq!(config.threshold_for(CycleKind::Freeze), 28.0);
        assert_eq!(config.trigger_pct_for(CycleKind::Freeze), 50.0);
    }

    #[test]
    fn rain_threshold_is_the_trigger_bar() {
        let config = EngineConfig::new().with_rain_probability_threshold(70.0);
        assert_eq!(config.threshold_for(CycleKind::Rain), 70.0);
        assert_eq!(config.trigger_pct_for(CycleKind::Rain), 70.0);
    }

    #[test]
    fn derives_station_cache_config() {
        let config = EngineConfig::new()
            .with_station_limit(5)
            .with_pinned(vec![PinnedMatcher::id("KBOS")])
            .with_relocation_threshold_km(None);

        let cache = config.station_cache_config();
        assert_eq!(cache.limit, 5);
        assert_eq!(cache.pinned, vec![PinnedMatcher::id("KBOS")]);
        assert_eq!(cache.relocation_threshold_km, None);
    }
}
