//! Domain types for the weather decision engine.
//!
//! Coordinates are validated at construction, so code receiving a
//! [`Coordinate`] can trust its range. Stations and observations are
//! immutable values superseded on each refresh.

mod coordinate;
mod decision;
mod observation;
mod station;
pub mod units;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinate, distance_km};
pub use decision::{
    ClassificationResult, ConfidenceLevel, ConfidenceScore, CycleKind, CycleStatus,
    DecisionResult, StationContribution,
};
pub use observation::Observation;
pub use station::Station;
