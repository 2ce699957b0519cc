//! Station ranking and candidate selection.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tracing::debug;

use crate::domain::{Coordinate, Station};

use super::error::StationError;

/// Trait for providing the station catalog.
///
/// This abstraction allows the directory to be tested with mock data.
pub trait StationSource: Send + Sync {
    /// Fetch every station the source knows about.
    fn fetch_all_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<Station>, StationError>> + Send;
}

/// A rule that always includes a station, regardless of distance.
///
/// Both forms compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinnedMatcher {
    /// Station id equals the given value.
    Id(String),
    /// Station name contains the given value.
    NameContains(String),
}

impl PinnedMatcher {
    pub fn id(id: impl Into<String>) -> Self {
        PinnedMatcher::Id(id.into())
    }

    pub fn name_contains(needle: impl Into<String>) -> Self {
        PinnedMatcher::NameContains(needle.into())
    }

    pub fn matches(&self, station: &Station) -> bool {
        match self {
            PinnedMatcher::Id(id) => station.id.eq_ignore_ascii_case(id),
            PinnedMatcher::NameContains(needle) => station.name_contains(needle),
        }
    }
}

/// Error returned when parsing an empty pinned matcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid pinned station matcher: {0:?}")]
pub struct InvalidPinnedMatcher(String);

impl FromStr for PinnedMatcher {
    type Err = InvalidPinnedMatcher;

    /// Parse `id:KBOS`, `name:logan`, or bare text (a name match).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let matcher = if let Some(id) = s.strip_prefix("id:") {
            PinnedMatcher::id(id.trim())
        } else if let Some(name) = s.strip_prefix("name:") {
            PinnedMatcher::name_contains(name.trim())
        } else {
            PinnedMatcher::name_contains(s)
        };

        match &matcher {
            PinnedMatcher::Id(v) | PinnedMatcher::NameContains(v) if v.is_empty() => {
                Err(InvalidPinnedMatcher(s.to_string()))
            }
            _ => Ok(matcher),
        }
    }
}

impl fmt::Display for PinnedMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinnedMatcher::Id(id) => write!(f, "id:{id}"),
            PinnedMatcher::NameContains(name) => write!(f, "name:{name}"),
        }
    }
}

/// Finds candidate stations near a point.
#[derive(Debug, Clone)]
pub struct StationDirectory<S> {
    source: S,
}

impl<S: StationSource> StationDirectory<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch the full, unranked catalog.
    pub async fn fetch_all_stations(&self) -> Result<Vec<Station>, StationError> {
        self.source.fetch_all_stations().await
    }

    /// Select the `limit` nearest stations plus any pinned matches.
    ///
    /// Fails only if the catalog fetch fails or yields no stations.
    pub async fn find_nearest_stations(
        &self,
        origin: &Coordinate,
        limit: usize,
        pinned: &[PinnedMatcher],
    ) -> Result<Vec<Station>, StationError> {
        let catalog = self.fetch_all_stations().await?;
        if catalog.is_empty() {
            return Err(StationError::NoStations);
        }

        let candidates = select_candidates(&catalog, origin, limit, pinned);
        debug!(
            catalog = catalog.len(),
            selected = candidates.len(),
            origin = %origin,
            "Selected candidate stations"
        );
        Ok(candidates)
    }
}

/// Rank stations by distance from `origin` and pick candidates.
///
/// The first `limit` stations by ascending distance form the primary set
/// (ties keep catalog order). Each pinned matcher is then searched
/// against the whole ranked list; its first match is appended unless a
/// station with the same id is already present.
pub fn select_candidates(
    catalog: &[Station],
    origin: &Coordinate,
    limit: usize,
    pinned: &[PinnedMatcher],
) -> Vec<Station> {
    let mut ranked: Vec<Station> = catalog.iter().map(|s| s.ranked_from(origin)).collect();
    // Stable sort: equal distances keep their catalog order
    ranked.sort_by(|a, b| {
        let da = a.distance_from_query_km.unwrap_or(f64::INFINITY);
        let db = b.distance_from_query_km.unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });

    let mut selected: Vec<Station> = ranked.iter().take(limit).cloned().collect();

    for matcher in pinned {
        let Some(found) = ranked.iter().find(|s| matcher.matches(s)) else {
            debug!(matcher = %matcher, "Pinned station not found in catalog");
            continue;
        };
        if selected.iter().any(|s| s.id == found.id) {
            continue;
        }
        selected.push(found.clone());
    }

    selected
}
