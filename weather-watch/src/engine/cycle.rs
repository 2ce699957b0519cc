//! The Aggregation & Decision Engine.
//!
//! A cycle resolves candidate stations and fetches every candidate's
//! latest observation concurrently, all under one overall deadline. What
//! came back is classified and combined into a [`DecisionResult`]. Per-station
//! failures are absorbed: a cycle with nothing usable reports "no data"
//! rather than failing.

use chrono::Utc;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::domain::{Coordinate, CycleKind, DecisionResult, Observation, Station};
use crate::observations::ObservationSource;
use crate::stations::{StationCache, StationDirectory, StationSource};

use super::aggregate::{
    ClassifiedObservation, build_contributions, max_distance_km, positive_percentage,
};
use super::config::EngineConfig;
use super::confidence::{ConfidenceInputs, Signal, score_confidence};

/// Runs rain and freeze decision cycles.
///
/// Holds no state between cycles apart from the station cache. Repeat
/// triggering on consecutive cycles is expected; debouncing is up to
/// the caller.
pub struct DecisionEngine<S, O> {
    stations: StationCache<S>,
    observations: O,
    config: EngineConfig,
}

impl<S: StationSource, O: ObservationSource> DecisionEngine<S, O> {
    pub fn new(station_source: S, observations: O, config: EngineConfig) -> Self {
        let stations = StationCache::new(
            StationDirectory::new(station_source),
            config.station_cache_config(),
        );
        Self {
            stations,
            observations,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn run_rain_cycle(&self, origin: Coordinate) -> DecisionResult {
        self.run_cycle(CycleKind::Rain, origin).await
    }

    pub async fn run_freeze_cycle(&self, origin: Coordinate) -> DecisionResult {
        self.run_cycle(CycleKind::Freeze, origin).await
    }

    /// Force the next cycle to refetch the station catalog.
    pub async fn clear_station_cache(&self) {
        self.stations.clear().await;
    }

    /// The stations a cycle at `origin` would consult, ranked from `origin`.
    pub async fn candidate_stations(&self, origin: &Coordinate) -> Vec<Station> {
        self.stations
            .get_nearby_stations(origin, self.config.station_refresh_interval)
            .await
            .iter()
            .map(|s| s.ranked_from(origin))
            .collect()
    }

    /// Run one cycle of `kind` at `origin`.
    pub async fn run_cycle(&self, kind: CycleKind, origin: Coordinate) -> DecisionResult {
        let checked_at = Utc::now();
        let threshold_used = self.config.threshold_for(kind);
        let deadline = Instant::now() + self.config.cycle_deadline;

        let Ok(candidates) = timeout_at(deadline, self.candidate_stations(&origin)).await else {
            warn!(
                kind = %kind,
                deadline_secs = self.config.cycle_deadline.as_secs_f64(),
                "Cycle deadline reached while resolving stations, reporting no data"
            );
            return DecisionResult::no_data(kind, threshold_used, checked_at);
        };
        let observations = self.fetch_observations(&candidates, deadline).await;

        if observations.is_empty() {
            info!(
                kind = %kind,
                candidates = candidates.len(),
                "No usable observations, reporting no data"
            );
            return DecisionResult::no_data(kind, threshold_used, checked_at);
        }

        let classified: Vec<ClassifiedObservation> = observations
            .into_iter()
            .map(|o| ClassifiedObservation::new(o, self.config.freeze_threshold_f))
            .collect();

        let positive = classified
            .iter()
            .filter(|c| c.is_positive_for(kind))
            .count();
        let weighted_percentage = positive_percentage(positive, classified.len());
        let triggered = weighted_percentage >= self.config.trigger_pct_for(kind);

        let contributions = build_contributions(kind, &classified, &origin);
        let max_distance = max_distance_km(&contributions);

        let confidence = score_confidence(&ConfidenceInputs {
            station_count: classified.len(),
            positive_pct: weighted_percentage,
            max_distance_km: max_distance.unwrap_or_default(),
            signal: self.signal_for(kind, &classified),
        });

        info!(
            kind = %kind,
            pct = weighted_percentage,
            triggered,
            stations_used = classified.len(),
            confidence = confidence.score,
            "Decision cycle complete"
        );

        DecisionResult {
            kind,
            triggered,
            weighted_percentage,
            threshold_used,
            stations_used: classified.len(),
            max_distance_km: max_distance,
            contributions,
            confidence: Some(confidence),
            checked_at,
        }
    }

    fn signal_for(&self, kind: CycleKind, classified: &[ClassifiedObservation]) -> Signal {
        match kind {
            CycleKind::Rain => Signal::Rain {
                max_precipitation_in: classified
                    .iter()
                    .filter_map(|c| c.observation.precipitation_last_hour_in)
                    .max_by(f64::total_cmp),
                text_driven: classified
                    .iter()
                    .filter_map(|c| c.rain_signal)
                    .any(|s| s.is_text_driven()),
            },
            CycleKind::Freeze => {
                let temperatures: Vec<f64> = classified
                    .iter()
                    .filter_map(|c| c.observation.temperature_f)
                    .collect();
                let mean_temperature_f = (!temperatures.is_empty())
                    .then(|| temperatures.iter().sum::<f64>() / temperatures.len() as f64);
                Signal::Freeze {
                    mean_temperature_f,
                    threshold_f: self.config.freeze_threshold_f,
                }
            }
        }
    }

    /// Fetch every candidate's observation concurrently.
    ///
    /// Returns the usable observations in candidate order. Stations that
    /// fail, or have not answered by `deadline`, are dropped.
    async fn fetch_observations(&self, candidates: &[Station], deadline: Instant) -> Vec<Observation> {
        let mut pending: FuturesUnordered<_> = candidates
            .iter()
            .enumerate()
            .map(|(index, station)| async move {
                (index, self.observations.fetch_observation(station).await)
            })
            .collect();

        let mut settled = vec![false; candidates.len()];
        let mut slots: Vec<Option<Observation>> = vec![None; candidates.len()];

        loop {
            match timeout_at(deadline, pending.next()).await {
                Ok(Some((index, observation))) => {
                    settled[index] = true;
                    slots[index] = observation;
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        outstanding = pending.len(),
                        deadline_secs = self.config.cycle_deadline.as_secs_f64(),
                        "Cycle deadline reached, dropping unanswered stations"
                    );
                    for (station, _) in candidates.iter().zip(&settled).filter(|(_, s)| !**s) {
                        debug!(station = %station.id, "No observation before deadline");
                    }
                    break;
                }
            }
        }

        slots.into_iter().flatten().collect()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
