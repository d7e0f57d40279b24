//! Response-pattern analysis - alternation, flat-lining, extremity bias.

use serde::{Deserialize, Serialize};

use crate::domain::scoring::ResponsePatternStats;

/// Minimum number of ordered values the pattern checks need.
const MIN_VALUES: usize = 3;

/// Fraction of sign flips at which alternation counts as zigzag.
const ZIGZAG_THRESHOLD: f64 = 0.6;

/// Fraction of the sequence one run may cover before it counts as
/// straight-lining.
const STRAIGHT_LINE_THRESHOLD: f64 = 0.7;

/// Fraction of values at the observed extremes that counts as bias.
const EXTREME_BIAS_THRESHOLD: f64 = 0.8;

/// Coefficient-of-variation bounds for the variability flags.
const LOW_VARIABILITY_CV: f64 = 0.15;
const HIGH_VARIABILITY_CV: f64 = 3.0;

const CONSTANT_PENALTY: f64 = 0.1;
const ZIGZAG_PENALTY: f64 = 0.4;
const STRAIGHT_LINE_PENALTY: f64 = 0.3;
const EXTREME_BIAS_PENALTY: f64 = 0.6;
const LOW_VARIABILITY_PENALTY: f64 = 0.7;
const HIGH_VARIABILITY_PENALTY: f64 = 0.5;

/// Pattern flags over the ordered-by-item-number score sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternAnalysis {
    /// False when fewer than three values were available.
    pub available: bool,
    pub constant_response: bool,
    pub zigzag_pattern: bool,
    pub straight_line_pattern: bool,
    pub extreme_response_bias: bool,
    pub low_variability: bool,
    pub high_variability: bool,
    /// Sign flips per adjacent-difference pair (0.0 to 1.0).
    pub alternation_ratio: f64,
    /// Longest run of consecutive equal values.
    pub longest_run: usize,
    pub validity_score: f64,
}

impl PatternAnalysis {
    /// Returns the not-computed placeholder.
    pub(super) fn unavailable() -> Self {
        Self {
            available: false,
            constant_response: false,
            zigzag_pattern: false,
            straight_line_pattern: false,
            extreme_response_bias: false,
            low_variability: false,
            high_variability: false,
            alternation_ratio: 0.0,
            longest_run: 0,
            validity_score: 1.0,
        }
    }

    /// Analyzes the ordered score sequence.
    ///
    /// `stats` is the scoring engine's description of the same values;
    /// the flags compound multiplicatively into the validity score.
    pub fn analyze(values: &[f64], stats: &ResponsePatternStats) -> Self {
        if values.len() < MIN_VALUES {
            return Self::unavailable();
        }

        let n = values.len();
        let constant_response = stats.unique_values == 1;

        let flips = Self::count_sign_flips(values);
        let alternation_ratio = flips as f64 / (n - 2) as f64;
        let zigzag_pattern = alternation_ratio >= ZIGZAG_THRESHOLD;

        let longest_run = Self::longest_run(values);
        let straight_line_pattern = longest_run as f64 / n as f64 > STRAIGHT_LINE_THRESHOLD;

        let extreme_response_bias = Self::extreme_fraction(values) > EXTREME_BIAS_THRESHOLD;

        // CV is undefined around a zero mean; skip the variability flags there.
        let cv = if stats.mean.abs() < f64::EPSILON {
            None
        } else {
            Some(stats.std_dev / stats.mean)
        };
        let low_variability = cv.is_some_and(|cv| cv < LOW_VARIABILITY_CV);
        let high_variability = cv.is_some_and(|cv| cv > HIGH_VARIABILITY_CV);

        let mut score: f64 = 1.0;
        if constant_response {
            score *= CONSTANT_PENALTY;
        }
        if zigzag_pattern {
            score *= ZIGZAG_PENALTY;
        }
        if straight_line_pattern {
            score *= STRAIGHT_LINE_PENALTY;
        }
        if extreme_response_bias {
            score *= EXTREME_BIAS_PENALTY;
        }
        if low_variability {
            score *= LOW_VARIABILITY_PENALTY;
        }
        if high_variability {
            score *= HIGH_VARIABILITY_PENALTY;
        }

        Self {
            available: true,
            constant_response,
            zigzag_pattern,
            straight_line_pattern,
            extreme_response_bias,
            low_variability,
            high_variability,
            alternation_ratio,
            longest_run,
            validity_score: score.clamp(0.0, 1.0),
        }
    }

    /// Counts direction reversals between adjacent differences.
    fn count_sign_flips(values: &[f64]) -> usize {
        let mut flips = 0;
        for i in 2..values.len() {
            let previous = values[i - 1] - values[i - 2];
            let current = values[i] - values[i - 1];
            if previous * current < 0.0 {
                flips += 1;
            }
        }
        flips
    }

    /// Longest run of consecutive equal values.
    fn longest_run(values: &[f64]) -> usize {
        let mut longest = 1;
        let mut current = 1;
        for window in values.windows(2) {
            if window[0] == window[1] {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 1;
            }
        }
        longest
    }

    /// Fraction of values sitting at the observed minimum or maximum.
    fn extreme_fraction(values: &[f64]) -> f64 {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let at_extremes = values.iter().filter(|v| **v == min || **v == max).count();
        at_extremes as f64 / values.len() as f64
    }
}
