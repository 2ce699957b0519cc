//! Scenario tests for decision cycles.

use super::*;
use crate::domain::{ConfidenceLevel, CycleStatus};
use crate::observations::ObservationError;
use crate::stations::{PinnedMatcher, StationError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn origin() -> Coordinate {
    Coordinate::new(42.0, -71.0).unwrap()
}

/// Stations due north of the origin, roughly 11 km apart.
fn station(id: &str, lat: f64) -> Station {
    Station::new(
        id,
        format!("{id} Field"),
        Coordinate::new(lat, -71.0).unwrap(),
        format!("https://api.test/stations/{id}/observations/latest"),
    )
}

fn catalog(n: usize) -> Vec<Station> {
    (0..n)
        .map(|i| station(&format!("S{i}"), 42.1 + 0.1 * i as f64))
        .collect()
}

struct MockCatalog {
    stations: Vec<Station>,
    delay: Duration,
    fetches: Arc<AtomicUsize>,
}

impl StationSource for MockCatalog {
    async fn fetch_all_stations(&self) -> Result<Vec<Station>, StationError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.stations.clone())
    }
}

#[derive(Debug, Clone, Default)]
struct Reading {
    temperature_f: Option<f64>,
    precipitation_in: Option<f64>,
    humidity_pct: Option<f64>,
    description: Option<&'static str>,
}

/// What a station answers with.
#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    /// `None` fails the fetch.
    reading: Option<Reading>,
}

impl Script {
    fn reading(reading: Reading) -> Self {
        Self {
            delay: Duration::ZERO,
            reading: Some(reading),
        }
    }

    fn precipitation(inches: f64) -> Self {
        Self::reading(Reading {
            precipitation_in: Some(inches),
            ..Default::default()
        })
    }

    fn text(description: &'static str) -> Self {
        Self::reading(Reading {
            precipitation_in: Some(0.0),
            description: Some(description),
            ..Default::default()
        })
    }

    fn temperature(f: f64) -> Self {
        Self::reading(Reading {
            temperature_f: Some(f),
            ..Default::default()
        })
    }

    fn fail() -> Self {
        Self {
            delay: Duration::ZERO,
            reading: None,
        }
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct MockObservations {
    scripts: HashMap<String, Script>,
    fetches: Arc<AtomicUsize>,
}

impl ObservationSource for MockObservations {
    async fn latest_observation(&self, station: &Station) -> Result<Observation, ObservationError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .get(&station.id)
            .cloned()
            .unwrap_or_else(Script::fail);

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }

        let reading = script.reading.ok_or(ObservationError::Api {
            status: 500,
            message: "station offline".into(),
        })?;

        let mut obs = Observation::empty(station.clone());
        obs.temperature_f = reading.temperature_f;
        obs.precipitation_last_hour_in = reading.precipitation_in;
        obs.relative_humidity_pct = reading.humidity_pct;
        obs.text_description = reading.description.map(str::to_string);
        Ok(obs)
    }
}

struct Harness {
    engine: DecisionEngine<MockCatalog, MockObservations>,
    catalog_fetches: Arc<AtomicUsize>,
    observation_fetches: Arc<AtomicUsize>,
}

fn harness(stations: Vec<Station>, scripts: Vec<(&str, Script)>, config: EngineConfig) -> Harness {
    let catalog_fetches = Arc::new(AtomicUsize::new(0));
    let observation_fetches = Arc::new(AtomicUsize::new(0));

    let engine = DecisionEngine::new(
        MockCatalog {
            stations,
            delay: Duration::ZERO,
            fetches: Arc::clone(&catalog_fetches),
        },
        MockObservations {
            scripts: scripts
                .into_iter()
                .map(|(id, s)| (id.to_string(), s))
                .collect(),
            fetches: Arc::clone(&observation_fetches),
        },
        config,
    );

    Harness {
        engine,
        catalog_fetches,
        observation_fetches,
    }
}

fn ids(result: &DecisionResult) -> Vec<&str> {
    result
        .contributions
        .iter()
        .map(|c| c.station.id.as_str())
        .collect()
}

fn two_of_three_raining() -> Vec<(&'static str, Script)> {
    vec![
        ("S0", Script::precipitation(0.02)),
        ("S1", Script::text("Light Rain")),
        ("S2", Script::text("Clear")),
    ]
}

#[tokio::test]
async fn rain_two_of_three_triggers_at_default_threshold() {
    let h = harness(catalog(3), two_of_three_raining(), EngineConfig::default());

    let result = h.engine.run_rain_cycle(origin()).await;

    assert_eq!(result.kind, CycleKind::Rain);
    assert_eq!(result.stations_used, 3);
    assert!((result.weighted_percentage - 66.666_666_7).abs() < 1e-4);
    assert!(result.triggered);
    assert_eq!(result.threshold_used, 50.0);
    assert_eq!(result.status(), CycleStatus::Triggered);
    assert_eq!(ids(&result), vec!["S0", "S1", "S2"]);

    let positives: Vec<bool> = result.contributions.iter().map(|c| c.is_positive).collect();
    assert_eq!(positives, vec![true, true, false]);
}

#[tokio::test]
async fn rain_two_of_three_does_not_trigger_at_seventy() {
    let config = EngineConfig::default().with_rain_probability_threshold(70.0);
    let h = harness(catalog(3), two_of_three_raining(), config);

    let result = h.engine.run_rain_cycle(origin()).await;

    assert!((result.weighted_percentage - 66.666_666_7).abs() < 1e-4);
    assert!(!result.triggered);
    assert_eq!(result.threshold_used, 70.0);
    assert_eq!(result.status(), CycleStatus::Clear);
}

#[tokio::test]
async fn freeze_exactly_half_triggers() {
    let config = EngineConfig::default().with_station_limit(4);
    let h = harness(
        catalog(4),
        vec![
            ("S0", Script::temperature(30.0)),
            ("S1", Script::temperature(35.0)),
            ("S2", Script::temperature(35.1)),
            ("S3", Script::temperature(50.0)),
        ],
        config,
    );

    let result = h.engine.run_freeze_cycle(origin()).await;

    assert_eq!(result.kind, CycleKind::Freeze);
    assert_eq!(result.stations_used, 4);
    assert_eq!(result.weighted_percentage, 50.0);
    assert!(result.triggered);
    assert_eq!(result.threshold_used, 35.0);
}

#[tokio::test]
async fn freeze_station_threshold_only_decides_votes() {
    let config = EngineConfig::default()
        .with_station_limit(4)
        .with_freeze_threshold_f(32.0);
    let h = harness(
        catalog(4),
        vec![
            ("S0", Script::temperature(30.0)),
            ("S1", Script::temperature(34.0)),
            ("S2", Script::temperature(40.0)),
            ("S3", Script::temperature(50.0)),
        ],
        config,
    );

    let result = h.engine.run_freeze_cycle(origin()).await;

    assert_eq!(result.weighted_percentage, 25.0);
    assert!(!result.triggered);
    assert_eq!(result.threshold_used, 32.0);
}

#[tokio::test]
async fn temperature_only_station_is_usable_for_both_cycles() {
    let h = harness(
        catalog(1),
        vec![("S0", Script::temperature(20.0))],
        EngineConfig::default(),
    );

    let freeze = h.engine.run_freeze_cycle(origin()).await;
    assert_eq!(freeze.stations_used, 1);
    assert!(freeze.triggered);

    let rain = h.engine.run_rain_cycle(origin()).await;
    assert_eq!(rain.stations_used, 1);
    assert_eq!(rain.weighted_percentage, 0.0);
    assert_eq!(rain.status(), CycleStatus::Clear);
}

#[tokio::test]
async fn zero_usable_stations_is_no_data() {
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::fail()),
            ("S1", Script::fail()),
            ("S2", Script::fail()),
        ],
        EngineConfig::default(),
    );

    let result = h.engine.run_rain_cycle(origin()).await;

    assert_eq!(result.stations_used, 0);
    assert!(!result.triggered);
    assert_eq!(result.status(), CycleStatus::NoData);
    assert!(result.contributions.is_empty());
    assert!(result.confidence.is_none());
    assert_eq!(result.max_distance_km, None);
    assert_eq!(h.observation_fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_catalog_is_no_data() {
    let h = harness(vec![], vec![], EngineConfig::default());

    let result = h.engine.run_freeze_cycle(origin()).await;

    assert_eq!(result.status(), CycleStatus::NoData);
    assert_eq!(h.observation_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_station_is_dropped() {
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::precipitation(0.5)),
            ("S1", Script::fail()),
            ("S2", Script::text("Clear")),
        ],
        EngineConfig::default(),
    );

    let result = h.engine.run_rain_cycle(origin()).await;

    assert_eq!(result.stations_used, 2);
    assert_eq!(ids(&result), vec!["S0", "S2"]);
    assert_eq!(result.weighted_percentage, 50.0);
    assert!(result.triggered);
}

#[tokio::test(start_paused = true)]
async fn deadline_drops_unresponsive_station() {
    let config = EngineConfig::default().with_cycle_deadline(Duration::from_secs(40));
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::temperature(30.0)),
            ("S1", Script::temperature(30.0).delayed(Duration::from_secs(3600))),
            ("S2", Script::temperature(50.0)),
        ],
        config,
    );

    let started = tokio::time::Instant::now();
    let result = h.engine.run_freeze_cycle(origin()).await;

    assert!(started.elapsed() < Duration::from_secs(41));
    assert_eq!(result.stations_used, 2);
    assert_eq!(ids(&result), vec!["S0", "S2"]);
    assert_eq!(result.weighted_percentage, 50.0);
}

#[tokio::test(start_paused = true)]
async fn observation_fetches_overlap() {
    let slow = Duration::from_secs(30);
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::temperature(30.0).delayed(slow)),
            ("S1", Script::temperature(30.0).delayed(slow)),
            ("S2", Script::temperature(50.0).delayed(slow)),
        ],
        EngineConfig::default().with_cycle_deadline(Duration::from_secs(40)),
    );

    let started = tokio::time::Instant::now();
    let result = h.engine.run_freeze_cycle(origin()).await;

    assert_eq!(result.stations_used, 3);
    assert!(started.elapsed() < Duration::from_secs(31));
}

#[tokio::test(start_paused = true)]
async fn slow_catalog_is_bounded_by_cycle_deadline() {
    let engine = DecisionEngine::new(
        MockCatalog {
            stations: catalog(3),
            delay: Duration::from_secs(600),
            fetches: Arc::new(AtomicUsize::new(0)),
        },
        MockObservations {
            scripts: HashMap::new(),
            fetches: Arc::new(AtomicUsize::new(0)),
        },
        EngineConfig::default().with_cycle_deadline(Duration::from_secs(40)),
    );

    let started = tokio::time::Instant::now();
    let result = engine.run_rain_cycle(origin()).await;

    assert!(started.elapsed() <= Duration::from_secs(40));
    assert_eq!(result.status(), CycleStatus::NoData);
    assert!(result.contributions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn catalog_time_counts_against_cycle_deadline() {
    let engine = DecisionEngine::new(
        MockCatalog {
            stations: catalog(2),
            delay: Duration::from_secs(30),
            fetches: Arc::new(AtomicUsize::new(0)),
        },
        MockObservations {
            scripts: [
                ("S0".to_string(), Script::temperature(20.0)),
                (
                    "S1".to_string(),
                    Script::temperature(20.0).delayed(Duration::from_secs(20)),
                ),
            ]
            .into_iter()
            .collect(),
            fetches: Arc::new(AtomicUsize::new(0)),
        },
        EngineConfig::default().with_cycle_deadline(Duration::from_secs(40)),
    );

    let started = tokio::time::Instant::now();
    let result = engine.run_freeze_cycle(origin()).await;

    assert!(started.elapsed() <= Duration::from_secs(40));
    assert_eq!(result.stations_used, 1);
    assert_eq!(ids(&result), vec!["S0"]);
}

#[tokio::test(start_paused = true)]
async fn contributions_follow_candidate_order_not_arrival_order() {
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::text("Rain").delayed(Duration::from_secs(5))),
            ("S1", Script::text("Clear").delayed(Duration::from_secs(1))),
            ("S2", Script::text("Drizzle")),
        ],
        EngineConfig::default(),
    );

    let result = h.engine.run_rain_cycle(origin()).await;

    assert_eq!(ids(&result), vec!["S0", "S1", "S2"]);
}

#[tokio::test]
async fn pinned_distant_station_contributes() {
    let mut stations = catalog(3);
    stations.push(station("KFAR", 45.0));

    let config = EngineConfig::default()
        .with_station_limit(2)
        .with_pinned(vec![PinnedMatcher::id("kfar")]);
    let h = harness(
        stations,
        vec![
            ("S0", Script::temperature(40.0)),
            ("S1", Script::temperature(40.0)),
            ("S2", Script::temperature(10.0)),
            ("KFAR", Script::temperature(10.0)),
        ],
        config,
    );

    let result = h.engine.run_freeze_cycle(origin()).await;

    assert_eq!(ids(&result), vec!["S0", "S1", "KFAR"]);
    let far = &result.contributions[2];
    assert!(far.distance_km > 300.0);
    assert_eq!(result.max_distance_km, Some(far.distance_km));
}

#[tokio::test]
async fn contributions_carry_distance_and_normalized_weights() {
    let h = harness(catalog(3), two_of_three_raining(), EngineConfig::default());

    let result = h.engine.run_rain_cycle(origin()).await;

    let total: f64 = result.contributions.iter().map(|c| c.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for c in &result.contributions {
        assert_eq!(c.station.distance_from_query_km, Some(c.distance_km));
    }
    assert!(result.contributions[0].weight > result.contributions[2].weight);
    // Closer stations are the positive ones, so the weighted view leans wetter
    assert!(result.weighted_signal_pct() > result.weighted_percentage);
}

#[tokio::test]
async fn catalog_is_fetched_once_across_cycles() {
    let h = harness(catalog(3), two_of_three_raining(), EngineConfig::default());

    h.engine.run_rain_cycle(origin()).await;
    h.engine.run_freeze_cycle(origin()).await;
    assert_eq!(h.catalog_fetches.load(Ordering::SeqCst), 1);
    assert_eq!(h.observation_fetches.load(Ordering::SeqCst), 6);

    h.engine.clear_station_cache().await;
    h.engine.run_rain_cycle(origin()).await;
    assert_eq!(h.catalog_fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn candidate_stations_are_ranked_from_the_query() {
    let h = harness(catalog(5), vec![], EngineConfig::default());

    let nearby = Coordinate::new(42.01, -71.0).unwrap();
    h.engine.candidate_stations(&origin()).await;
    let candidates = h.engine.candidate_stations(&nearby).await;

    assert_eq!(h.catalog_fetches.load(Ordering::SeqCst), 1);
    let expected = nearby.distance_km(&candidates[0].coordinate);
    assert_eq!(candidates[0].distance_from_query_km, Some(expected));
}

#[tokio::test]
async fn rain_confidence_credits_text_reports() {
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::text("Rain")),
            ("S1", Script::text("Showers")),
            ("S2", Script::text("Thunderstorm")),
        ],
        EngineConfig::default(),
    );

    let result = h.engine.run_rain_cycle(origin()).await;
    let confidence = result.confidence.unwrap();

    assert!(
        confidence
            .factors
            .iter()
            .any(|f| f == "Conditions reported as rain")
    );
    assert!(confidence.factors.iter().any(|f| f.contains("agreement")));
    // 3 stations 0.2, 100% agreement 0.3, within 33 km 0.1, text 0.1
    assert_eq!(confidence.score, 0.7);
    assert_eq!(confidence.level, ConfidenceLevel::High);
}

#[tokio::test]
async fn freeze_confidence_uses_threshold_margin() {
    let h = harness(
        catalog(3),
        vec![
            ("S0", Script::temperature(20.0)),
            ("S1", Script::temperature(22.0)),
            ("S2", Script::temperature(24.0)),
        ],
        EngineConfig::default(),
    );

    let result = h.engine.run_freeze_cycle(origin()).await;
    let confidence = result.confidence.unwrap();

    assert!(
        confidence
            .factors
            .iter()
            .any(|f| f.starts_with("Mean temperature 22.0°F"))
    );
}
