//! Combining classified observations into a decision.
//!
//! The trigger uses simple counting: every usable station is one vote.
//! Distance weights are computed for presentation alongside.

use crate::classify::{self, RainSignal};
use crate::domain::{
    ClassificationResult, Coordinate, CycleKind, Observation, StationContribution,
};

/// Distances under this count as this, so a co-located station does
/// not take all the weight.
const MIN_WEIGHT_DISTANCE_KM: f64 = 1.0;

/// An observation with its classification.
#[derive(Debug, Clone)]
pub struct ClassifiedObservation {
    pub observation: Observation,
    pub classification: ClassificationResult,
    pub rain_signal: Option<RainSignal>,
}

impl ClassifiedObservation {
    pub fn new(observation: Observation, freeze_threshold_f: f64) -> Self {
        let rain_signal = classify::rain_signal(&observation);
        let classification = ClassificationResult {
            is_raining: rain_signal.is_some(),
            is_freezing: classify::is_freezing(&observation, freeze_threshold_f),
        };
        Self {
            observation,
            classification,
            rain_signal,
        }
    }

    pub fn is_positive_for(&self, kind: CycleKind) -> bool {
        self.classification.is_positive_for(kind)
    }
}

/// Share of `usable` that is `positive`, as a percentage in [0, 100].
pub fn positive_percentage(positive: usize, usable: usize) -> f64 {
    if usable == 0 {
        return 0.0;
    }
    (positive as f64 / usable as f64 * 100.0).clamp(0.0, 100.0)
}

/// Normalized inverse-distance weights, in input order.
///
/// Each raw weight is `1 / max(d, 1 km)`; the result sums to 1.0
/// unless `distances_km` is empty.
pub fn inverse_distance_weights(distances_km: &[f64]) -> Vec<f64> {
    let raw: Vec<f64> = distances_km
        .iter()
        .map(|d| 1.0 / d.max(MIN_WEIGHT_DISTANCE_KM))
        .collect();
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return raw;
    }
    raw.into_iter().map(|w| w / total).collect()
}

/// One contribution per usable observation, in the order given.
///
/// Distances are measured from `origin`, so every contribution carries
/// one regardless of where its station was ranked from.
pub fn build_contributions(
    kind: CycleKind,
    classified: &[ClassifiedObservation],
    origin: &Coordinate,
) -> Vec<StationContribution> {
    let distances: Vec<f64> = classified
        .iter()
        .map(|c| origin.distance_km(&c.observation.station.coordinate))
        .collect();
    let weights = inverse_distance_weights(&distances);

    classified
        .iter()
        .zip(distances)
        .zip(weights)
        .map(|((c, distance_km), weight)| {
            let obs = &c.observation;
            StationContribution {
                station: obs.station.ranked_from(origin),
                distance_km,
                weight,
                temperature_f: obs.temperature_f,
                precipitation_in: obs.precipitation_last_hour_in,
                is_positive: c.is_positive_for(kind),
                text_description: obs.text_description.clone(),
            }
        })
        .collect()
}

/// Largest contribution distance, if any.
pub fn max_distance_km(contributions: &[StationContribution]) -> Option<f64> {
    contributions
        .iter()
        .map(|c| c.distance_km)
        .max_by(f64::total_cmp)
}
