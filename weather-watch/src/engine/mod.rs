//! Aggregation & Decision Engine.
//!
//! Combines observations from several nearby stations into a single rain
//! or freeze decision with an auditable confidence score, instead of
//! trusting any one station.

mod aggregate;
mod confidence;
mod config;
mod cycle;

pub use aggregate::{
    ClassifiedObservation, build_contributions, inverse_distance_weights, max_distance_km,
    positive_percentage,
};
pub use confidence::{ConfidenceInputs, Signal, score_confidence};
pub use config::EngineConfig;
pub use cycle::DecisionEngine;
