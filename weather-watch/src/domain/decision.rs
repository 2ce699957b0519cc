//! Decision cycle outputs.
//!
//! A [`DecisionResult`] is produced once per rain or freeze cycle and
//! carries enough detail (per-station contributions and a confidence
//! breakdown) for a caller to explain why an alert did or did not fire.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Station;

/// Which condition a cycle evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Rain,
    Freeze,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::Rain => write!(f, "rain"),
            CycleKind::Freeze => write!(f, "freeze"),
        }
    }
}

/// Per-observation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ClassificationResult {
    pub is_raining: bool,
    pub is_freezing: bool,
}

impl ClassificationResult {
    /// Whether this classification counts as positive for `kind`.
    pub fn is_positive_for(&self, kind: CycleKind) -> bool {
        match kind {
            CycleKind::Rain => self.is_raining,
            CycleKind::Freeze => self.is_freezing,
        }
    }
}

/// One station's input to a decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationContribution {
    pub station: Station,
    pub distance_km: f64,
    /// Normalized inverse-distance weight; weights across a result sum to 1.
    pub weight: f64,
    pub temperature_f: Option<f64>,
    pub precipitation_in: Option<f64>,
    pub is_positive: bool,
    pub text_description: Option<String>,
}

/// Coarse confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Bucket a score: LOW below 0.4, HIGH from 0.7, MEDIUM between.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            ConfidenceLevel::High
        } else if score >= 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Additive, explainable confidence indicator.
///
/// `score` is a sum of capped per-factor increments and is indicative
/// only; it can exceed 1.0 when every factor fires at its maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceScore {
    pub level: ConfidenceLevel,
    pub score: f64,
    pub factors: Vec<String>,
}

/// Whether a cycle fired, came back clear, or had nothing to go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Triggered,
    Clear,
    NoData,
}

/// Outcome of one rain or freeze cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub kind: CycleKind,
    pub triggered: bool,
    /// Share of usable stations that were positive, in [0, 100].
    pub weighted_percentage: f64,
    pub threshold_used: f64,
    pub stations_used: usize,
    pub max_distance_km: Option<f64>,
    pub contributions: Vec<StationContribution>,
    pub confidence: Option<ConfidenceScore>,
    pub checked_at: DateTime<Utc>,
}

impl DecisionResult {
    /// A non-triggered result for a cycle where no station reported.
    pub fn no_data(kind: CycleKind, threshold_used: f64, checked_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            triggered: false,
            weighted_percentage: 0.0,
            threshold_used,
            stations_used: 0,
            max_distance_km: None,
            contributions: Vec::new(),
            confidence: None,
            checked_at,
        }
    }

    pub fn status(&self) -> CycleStatus {
        if self.stations_used == 0 {
            CycleStatus::NoData
        } else if self.triggered {
            CycleStatus::Triggered
        } else {
            CycleStatus::Clear
        }
    }

    /// Distance-weighted share of positive stations, in [0, 100].
    ///
    /// For display only; `triggered` is decided by simple counting.
    pub fn weighted_signal_pct(&self) -> f64 {
        let total: f64 = self.contributions.iter().map(|c| c.weight).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let positive: f64 = self
            .contributions
            .iter()
            .filter(|c| c.is_positive)
            .map(|c| c.weight)
            .sum();
        (positive / total * 100.0).clamp(0.0, 100.0)
    }
}
