//! Outlier analysis - interquartile-range screening of score values.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::stats;

/// Minimum number of values for quartiles to mean anything.
const MIN_VALUES: usize = 4;

/// Tukey fence multiplier.
const IQR_FENCE: f64 = 1.5;

/// Outlier rate below which the score stays full.
const CLEAN_RATE: f64 = 0.1;

/// Outlier rate below which the score drops to the middle band.
const MODERATE_RATE: f64 = 0.2;

/// Outlier rate above which outliers count as excessive.
const EXCESSIVE_RATE: f64 = 0.15;

const MODERATE_SCORE: f64 = 0.7;
const HEAVY_SCORE: f64 = 0.4;

/// IQR-method outlier screening over the score values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierAnalysis {
    /// False when fewer than four values were available.
    pub available: bool,
    pub outlier_count: usize,
    /// Outliers / values (0.0 to 1.0).
    pub outlier_rate: f64,
    pub excessive: bool,
    /// Q1 - 1.5 * IQR.
    pub lower_bound: f64,
    /// Q3 + 1.5 * IQR.
    pub upper_bound: f64,
    pub validity_score: f64,
}

impl OutlierAnalysis {
    /// Returns the not-computed placeholder.
    pub(super) fn unavailable() -> Self {
        Self {
            available: false,
            outlier_count: 0,
            outlier_rate: 0.0,
            excessive: false,
            lower_bound: 0.0,
            upper_bound: 0.0,
            validity_score: 1.0,
        }
    }

    /// Screens the score values with Tukey fences.
    pub fn analyze(values: &[f64]) -> Self {
        if values.len() < MIN_VALUES {
            return Self::unavailable();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = stats::percentile(&sorted, 25.0);
        let q3 = stats::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let lower_bound = q1 - IQR_FENCE * iqr;
        let upper_bound = q3 + IQR_FENCE * iqr;

        let outlier_count = values
            .iter()
            .filter(|v| **v < lower_bound || **v > upper_bound)
            .count();
        let outlier_rate = outlier_count as f64 / values.len() as f64;

        let validity_score = if outlier_rate < CLEAN_RATE {
            1.0
        } else if outlier_rate < MODERATE_RATE {
            MODERATE_SCORE
        } else {
            HEAVY_SCORE
        };

        Self {
            available: true,
            outlier_count,
            outlier_rate,
            excessive: outlier_rate > EXCESSIVE_RATE,
            lower_bound,
            upper_bound,
            validity_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_four_values_is_unavailable() {
        let analysis = OutlierAnalysis::analyze(&[1.0, 2.0, 100.0]);
        assert!(!analysis.available);
        assert_eq!(analysis.validity_score, 1.0);
    }

    #[test]
    fn single_far_value_lands_in_moderate_band() {
        // Q1 = 2, Q3 = 4, fences at -1 and 7; rate 1/9 is just over 0.1
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 100.0];
        let analysis = OutlierAnalysis::analyze(&values);

        assert!(analysis.available);
        assert_eq!(analysis.outlier_count, 1);
        assert!((analysis.outlier_rate - 1.0 / 9.0).abs() < 1e-9);
        assert_eq!(analysis.lower_bound, -1.0);
        assert_eq!(analysis.upper_bound, 7.0);
        assert_eq!(analysis.validity_score, 0.7);
        assert!(!analysis.excessive);
    }

    #[test]
    fn tight_cluster_has_no_outliers() {
        let values = [2.0, 3.0, 3.0, 4.0, 3.0, 2.0, 4.0];
        let analysis = OutlierAnalysis::analyze(&values);
        assert_eq!(analysis.outlier_count, 0);
        assert_eq!(analysis.validity_score, 1.0);
        assert!(!analysis.excessive);
    }

    #[test]
    fn heavy_contamination_scores_low_and_excessive() {
        // 2 outliers in 8 values: rate 0.25
        let values = [3.0, 3.0, 3.0, 3.0, 3.0, 3.0, 50.0, -40.0];
        let analysis = OutlierAnalysis::analyze(&values);
        assert_eq!(analysis.outlier_count, 2);
        assert_eq!(analysis.validity_score, 0.4);
        assert!(analysis.excessive);
    }

    #[test]
    fn identical_values_have_degenerate_fences_but_no_outliers() {
        let values = [3.0, 3.0, 3.0, 3.0];
        let analysis = OutlierAnalysis::analyze(&values);
        assert_eq!(analysis.outlier_count, 0);
        assert_eq!(analysis.lower_bound, 3.0);
        assert_eq!(analysis.upper_bound, 3.0);
        assert_eq!(analysis.validity_score, 1.0);
    }

    #[test]
    fn low_side_outliers_are_caught() {
        let values = [-60.0, 10.0, 11.0, 12.0, 13.0, 11.0, 12.0, 10.0, 13.0, 12.0];
        let analysis = OutlierAnalysis::analyze(&values);
        assert_eq!(analysis.outlier_count, 1);
        assert_eq!(analysis.validity_score, 0.7);
    }
}
