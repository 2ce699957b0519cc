//! Observation Fetcher: per-station latest observations.
//!
//! Each candidate station is queried at its own observation endpoint and
//! the response is normalized to imperial units at parse time. A failed
//! fetch is never escalated; the caller treats it as "no observation
//! from this station this cycle".

mod cache;
mod client;
mod convert;
mod error;
mod types;

use std::future::Future;

use tracing::debug;

use crate::domain::{Observation, Station};

pub use cache::{CachedObservationSource, ObservationCacheConfig};
pub use client::{ObservationClient, ObservationClientConfig};
pub use convert::convert_observation;
pub use error::ObservationError;
pub use types::{ObservationFeature, ObservationProperties, Quantity};

/// Trait for fetching a station's latest observation.
///
/// This abstraction allows the engine to be tested with mock data.
pub trait ObservationSource: Send + Sync {
    /// Fetch the latest observation for `station`.
    fn latest_observation(
        &self,
        station: &Station,
    ) -> impl Future<Output = Result<Observation, ObservationError>> + Send;

    /// Fetch the latest observation, or `None` if it could not be had.
    ///
    /// Errors are logged at debug level and absorbed.
    fn fetch_observation(
        &self,
        station: &Station,
    ) -> impl Future<Output = Option<Observation>> + Send {
        async move {
            match self.latest_observation(station).await {
                Ok(observation) => Some(observation),
                Err(e) => {
                    debug!(station = %station.id, error = %e, "No observation from station");
                    None
                }
            }
        }
    }
}
