//! Confidence scoring.
//!
//! Each factor adds a capped increment and records a human-readable
//! reason. Caps: station count 0.3, agreement 0.3, distance 0.2, signal
//! strength 0.2, and a 0.1 bonus when rain was read from text. The sum
//! is indicative, not a probability, and can exceed 1.0 for rain.

use crate::domain::{ConfidenceLevel, ConfidenceScore};

/// The condition-specific evidence behind a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Rain {
        /// Largest hourly precipitation reported by any usable station.
        max_precipitation_in: Option<f64>,
        /// Whether any positive station was classified from its text
        /// description rather than measured precipitation.
        text_driven: bool,
    },
    Freeze {
        /// Mean reported temperature across usable stations.
        mean_temperature_f: Option<f64>,
        threshold_f: f64,
    },
}

/// Everything the score depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub station_count: usize,
    /// Positive percentage in [0, 100].
    pub positive_pct: f64,
    pub max_distance_km: f64,
    pub signal: Signal,
}

/// Score a decision.
pub fn score_confidence(inputs: &ConfidenceInputs) -> ConfidenceScore {
    let increments = [
        station_count_factor(inputs.station_count),
        agreement_factor(inputs.positive_pct),
        distance_factor(inputs.max_distance_km),
        signal_factor(&inputs.signal),
        text_bonus(&inputs.signal),
    ];

    let mut score = 0.0;
    let mut factors = Vec::new();
    for (increment, reason) in increments.into_iter().flatten() {
        score += increment;
        factors.push(reason);
    }
    // Keep float noise out of the bucket boundaries
    let score = (score * 1000.0_f64).round() / 1000.0;

    ConfidenceScore {
        level: ConfidenceLevel::from_score(score),
        score,
        factors,
    }
}

type Factor = Option<(f64, String)>;

fn station_count_factor(count: usize) -> Factor {
    let increment = match count {
        0 => return None,
        1 => 0.05,
        2 => 0.1,
        3 | 4 => 0.2,
        _ => 0.3,
    };
    let noun = if count == 1 { "station" } else { "stations" };
    Some((increment, format!("{count} reporting {noun}")))
}

fn agreement_factor(positive_pct: f64) -> Factor {
    let agreement = positive_pct.max(100.0 - positive_pct);
    let (increment, label) = if agreement >= 90.0 {
        (0.3, "Strong")
    } else if agreement >= 75.0 {
        (0.2, "Good")
    } else if agreement >= 60.0 {
        (0.1, "Moderate")
    } else {
        return None;
    };
    Some((increment, format!("{label} agreement ({agreement:.0}%)")))
}

fn distance_factor(max_distance_km: f64) -> Factor {
    let increment = if max_distance_km <= 10.0 {
        0.2
    } else if max_distance_km <= 25.0 {
        0.15
    } else if max_distance_km <= 50.0 {
        0.1
    } else {
        0.05
    };
    Some((
        increment,
        format!("All stations within {max_distance_km:.1} km"),
    ))
}

fn signal_factor(signal: &Signal) -> Factor {
    match *signal {
        Signal::Rain {
            max_precipitation_in,
            ..
        } => {
            let p = max_precipitation_in?;
            let increment = if p >= 0.10 {
                0.2
            } else if p >= 0.05 {
                0.15
            } else if p > 0.01 {
                0.1
            } else {
                return None;
            };
            Some((increment, format!("Measured precipitation {p:.2} in/hr")))
        }
        Signal::Freeze {
            mean_temperature_f,
            threshold_f,
        } => {
            let mean = mean_temperature_f?;
            let margin = (mean - threshold_f).abs();
            let increment = if margin >= 5.0 {
                0.2
            } else if margin >= 2.0 {
                0.1
            } else if margin > 0.0 {
                0.05
            } else {
                return None;
            };
            Some((
                increment,
                format!("Mean temperature {mean:.1}°F is {margin:.1}°F from threshold"),
            ))
        }
    }
}

fn text_bonus(signal: &Signal) -> Factor {
    match signal {
        Signal::Rain {
            text_driven: true, ..
        } => Some((0.1, "Conditions reported as rain".to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain(count: usize, pct: f64, max_km: f64, precip: Option<f64>, text: bool) -> ConfidenceInputs {
        ConfidenceInputs {
            station_count: count,
            positive_pct: pct,
            max_distance_km: max_km,
            signal: Signal::Rain {
                max_precipitation_in: precip,
                text_driven: text,
            },
        }
    }

    #[test]
    fn everything_firing_exceeds_one_for_rain() {
        let score = score_confidence(&rain(5, 100.0, 5.0, Some(0.5), true));
        assert_eq!(score.score, 1.1);
        assert_eq!(score.level, ConfidenceLevel::High);
        assert_eq!(score.factors.len(), 5);
    }

    #[test]
    fn weak_evidence_is_low() {
        let score = score_confidence(&rain(1, 50.0, 80.0, None, false));
        assert_eq!(score.score, 0.1);
        assert_eq!(score.level, ConfidenceLevel::Low);
        assert_eq!(
            score.factors,
            vec!["1 reporting station", "All stations within 80.0 km"]
        );
    }

    #[test]
    fn agreement_counts_either_direction() {
        let all_dry = score_confidence(&rain(3, 0.0, 30.0, Some(0.0), false));
        let all_wet = score_confidence(&rain(3, 100.0, 30.0, Some(0.0), false));
        assert_eq!(all_dry.score, all_wet.score);
        assert!(all_dry.factors.iter().any(|f| f == "Strong agreement (100%)"));
    }

    #[test]
    fn medium_band() {
        // 0.2 stations + 0.2 agreement (75%) + 0.1 distance (40 km)
        let score = score_confidence(&rain(4, 75.0, 40.0, None, false));
        assert_eq!(score.score, 0.5);
        assert_eq!(score.level, ConfidenceLevel::Medium);
    }

    #[test]
    fn precipitation_tiers() {
        let at = |p| score_confidence(&rain(1, 50.0, 80.0, Some(p), false)).score;
        assert_eq!(at(0.01), 0.1);
        assert_eq!(at(0.02), 0.2);
        assert_eq!(at(0.05), 0.25);
        assert_eq!(at(0.10), 0.3);
    }

    #[test]
    fn freeze_margin() {
        let freeze = |mean| ConfidenceInputs {
            station_count: 2,
            positive_pct: 50.0,
            max_distance_km: 100.0,
            signal: Signal::Freeze {
                mean_temperature_f: mean,
                threshold_f: 35.0,
            },
        };

        assert_eq!(score_confidence(&freeze(None)).score, 0.15);
        assert_eq!(score_confidence(&freeze(Some(35.0))).score, 0.15);
        assert_eq!(score_confidence(&freeze(Some(34.0))).score, 0.2);
        assert_eq!(score_confidence(&freeze(Some(38.0))).score, 0.25);
        assert_eq!(score_confidence(&freeze(Some(20.0))).score, 0.35);
    }

    #[test]
    fn freeze_has_no_text_bonus() {
        let inputs = ConfidenceInputs {
            station_count: 5,
            positive_pct: 100.0,
            max_distance_km: 5.0,
            signal: Signal::Freeze {
                mean_temperature_f: Some(10.0),
                threshold_f: 35.0,
            },
        };
        assert_eq!(score_confidence(&inputs).score, 1.0);
    }
}
