//! Short-lived cache for latest observations.
//!
//! Rain and freeze cycles usually run back to back over the same
//! candidate set. Caching each station's latest observation for a
//! couple of minutes lets the second cycle reuse the first cycle's
//! fetches. Upstream observations update roughly hourly, so a short TTL
//! loses nothing.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Observation, Station};

use super::ObservationSource;
use super::error::ObservationError;

/// Configuration for the observation cache.
#[derive(Debug, Clone)]
pub struct ObservationCacheConfig {
    /// TTL for cached observations.
    pub ttl: Duration,

    /// Maximum number of cached stations.
    pub max_capacity: u64,
}

impl Default for ObservationCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(120),
            max_capacity: 256,
        }
    }
}

/// An [`ObservationSource`] with caching.
///
/// Keyed by station id. Only successful fetches are cached, so a failed
/// station is retried on the next cycle.
pub struct CachedObservationSource<O> {
    inner: O,
    observations: MokaCache<String, Observation>,
}

impl<O: ObservationSource> CachedObservationSource<O> {
    pub fn new(inner: O, config: &ObservationCacheConfig) -> Self {
        let observations = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            observations,
        }
    }

    /// Access the underlying source for fetches that bypass the cache.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.observations.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.observations.invalidate_all();
    }
}

impl<O: ObservationSource> ObservationSource for CachedObservationSource<O> {
    async fn latest_observation(&self, station: &Station) -> Result<Observation, ObservationError> {
        if let Some(mut cached) = self.observations.get(&station.id).await {
            trace!(station = %station.id, "Observation cache hit");
            // The cached copy may carry a distance ranked from an earlier origin
            cached.station = station.clone();
            return Ok(cached);
        }

        let observation = self.inner.latest_observation(station).await?;
        self.observations
            .insert(station.id.clone(), observation.clone())
            .await;
        Ok(observation)
    }
}
