//! Station catalog client, ranking, and the candidate cache.
//!
//! The catalog is fetched from the upstream `/stations` endpoint, ranked
//! by great-circle distance from the query point, and the selected
//! candidates are cached in memory between decision cycles.

mod cache;
mod client;
mod directory;
mod error;

pub use cache::{
    DEFAULT_RELOCATION_THRESHOLD_KM, DEFAULT_STATION_LIMIT, StationCache, StationCacheConfig,
};
pub use client::{DEFAULT_MAX_PAGES, StationClient, StationClientConfig};
pub use directory::{
    InvalidPinnedMatcher, PinnedMatcher, StationDirectory, StationSource, select_candidates,
};
pub use error::StationError;
