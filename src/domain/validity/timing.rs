//! Timing analysis - response-speed plausibility.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::stats;

/// Below this a single response counts as too fast to be considered (ms).
const TOO_FAST_MS: f64 = 500.0;

/// Above this a single response counts as disengaged-slow (ms).
const TOO_SLOW_MS: f64 = 30_000.0;

/// Minimum single-response time under which speed is suspicious (ms).
const SUSPICIOUS_MIN_MS: f64 = 200.0;

/// Mean response time under which speed is suspicious (ms).
const SUSPICIOUS_MEAN_MS: f64 = 1_000.0;

/// Mean response time above which pacing drags (ms).
const SLOW_MEAN_MS: f64 = 20_000.0;

const SUSPICIOUS_SPEED_PENALTY: f64 = 0.3;
const FAST_MEAN_PENALTY: f64 = 0.4;
const SLOW_MEAN_PENALTY: f64 = 0.8;

/// Speed plausibility over the responses that carried a duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingAnalysis {
    /// False when no response carried timing.
    pub available: bool,
    pub mean_time_ms: f64,
    pub median_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    /// Responses faster than 500 ms.
    pub too_fast_count: usize,
    /// Responses slower than 30 s.
    pub too_slow_count: usize,
    pub suspicious_speed: bool,
    pub validity_score: f64,
}

impl TimingAnalysis {
    /// Returns the not-computed placeholder.
    pub(super) fn unavailable() -> Self {
        Self {
            available: false,
            mean_time_ms: 0.0,
            median_time_ms: 0.0,
            min_time_ms: 0.0,
            max_time_ms: 0.0,
            too_fast_count: 0,
            too_slow_count: 0,
            suspicious_speed: false,
            validity_score: 1.0,
        }
    }

    /// Analyzes response times in milliseconds.
    pub fn analyze(times_ms: &[f64]) -> Self {
        if times_ms.is_empty() {
            return Self::unavailable();
        }

        let mut sorted = times_ms.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = stats::mean(times_ms);
        let median = stats::median(&sorted);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let too_fast_count = times_ms.iter().filter(|t| **t < TOO_FAST_MS).count();
        let too_slow_count = times_ms.iter().filter(|t| **t > TOO_SLOW_MS).count();
        let suspicious_speed = min < SUSPICIOUS_MIN_MS || mean < SUSPICIOUS_MEAN_MS;

        let mut score: f64 = 1.0;
        if suspicious_speed {
            score *= SUSPICIOUS_SPEED_PENALTY;
        }
        if mean < SUSPICIOUS_MEAN_MS {
            score *= FAST_MEAN_PENALTY;
        }
        if mean > SLOW_MEAN_MS {
            score *= SLOW_MEAN_PENALTY;
        }

        Self {
            available: true,
            mean_time_ms: mean,
            median_time_ms: median,
            min_time_ms: min,
            max_time_ms: max,
            too_fast_count,
            too_slow_count,
            suspicious_speed,
            validity_score: score.clamp(0.0, 1.0),
        }
    }
}
