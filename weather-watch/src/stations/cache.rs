//! In-memory cache of the candidate station set.
//!
//! The catalog is national and changes rarely, so the ranked candidate
//! set is reused until the refresh interval elapses. A snapshot is also
//! discarded when the caller has moved further than the relocation
//! threshold from the point it was computed for.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Coordinate, Station};

use super::directory::{PinnedMatcher, StationDirectory, StationSource};

/// Default number of nearest stations to select.
pub const DEFAULT_STATION_LIMIT: usize = 3;

/// Default distance the origin may move before the snapshot is stale.
pub const DEFAULT_RELOCATION_THRESHOLD_KM: f64 = 25.0;

/// Which stations the cache selects.
#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    /// Number of nearest stations in the primary set.
    pub limit: usize,

    /// Stations always included regardless of distance.
    pub pinned: Vec<PinnedMatcher>,

    /// Refetch when the origin moves further than this. `None` keys
    /// freshness purely on elapsed time.
    pub relocation_threshold_km: Option<f64>,
}

impl StationCacheConfig {
    pub fn new(limit: usize, pinned: Vec<PinnedMatcher>) -> Self {
        Self {
            limit,
            pinned,
            relocation_threshold_km: Some(DEFAULT_RELOCATION_THRESHOLD_KM),
        }
    }

    pub fn with_relocation_threshold(mut self, km: Option<f64>) -> Self {
        self.relocation_threshold_km = km;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STATION_LIMIT, Vec::new())
    }
}

/// Last successful candidate set.
#[derive(Debug)]
struct Snapshot {
    stations: Vec<Station>,
    origin: Coordinate,
    fetched_at: Instant,
}

/// Time-bounded cache over a [`StationDirectory`].
///
/// The lock is held across a refetch, so concurrent cycles that miss
/// together share a single catalog request.
pub struct StationCache<S> {
    directory: StationDirectory<S>,
    config: StationCacheConfig,
    snapshot: Mutex<Option<Snapshot>>,
}

impl<S: StationSource> StationCache<S> {
    pub fn new(directory: StationDirectory<S>, config: StationCacheConfig) -> Self {
        Self {
            directory,
            config,
            snapshot: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &StationCacheConfig {
        &self.config
    }

    /// Candidate stations near `origin`.
    ///
    /// Serves the cached set while it is younger than `refresh_interval`.
    /// On a refetch failure, falls back to the previous set, or to an
    /// empty list if there is none. Never fails.
    pub async fn get_nearby_stations(
        &self,
        origin: &Coordinate,
        refresh_interval: Duration,
    ) -> Vec<Station> {
        let mut snapshot = self.snapshot.lock().await;

        if let Some(cached) = snapshot.as_ref()
            && self.is_fresh(cached, origin, refresh_interval)
        {
            debug!(count = cached.stations.len(), "Serving cached stations");
            return cached.stations.clone();
        }

        match self
            .directory
            .find_nearest_stations(origin, self.config.limit, &self.config.pinned)
            .await
        {
            Ok(stations) => {
                info!(count = stations.len(), origin = %origin, "Refreshed candidate stations");
                *snapshot = Some(Snapshot {
                    stations: stations.clone(),
                    origin: *origin,
                    fetched_at: Instant::now(),
                });
                stations
            }
            Err(e) => {
                let Some(previous) = snapshot.as_ref() else {
                    warn!(error = %e, "Failed to fetch stations, no previous set to fall back on");
                    return Vec::new();
                };
                warn!(
                    error = %e,
                    fallback = previous.stations.len(),
                    fallback_origin = %previous.origin,
                    fallback_origin_km = previous.origin.distance_km(origin),
                    "Failed to refresh stations, using previous set"
                );
                previous.stations.clone()
            }
        }
    }

    /// Force the next call to refetch.
    pub async fn clear(&self) {
        *self.snapshot.lock().await = None;
        debug!("Cleared station cache");
    }

    fn is_fresh(&self, cached: &Snapshot, origin: &Coordinate, refresh_interval: Duration) -> bool {
        if cached.fetched_at.elapsed() >= refresh_interval {
            return false;
        }
        match self.config.relocation_threshold_km {
            Some(limit) => cached.origin.distance_km(origin) <= limit,
            None => true,
        }
    }
}
