//! Immutable result types produced by a scoring run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::Percentage;

/// Score breakdown for one subscale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscaleScore {
    /// Sum of the answered items' scores within the subscale.
    pub score: f64,
    /// How many of the subscale's items were answered.
    pub items_included: u32,
    /// How many items the subscale defines.
    pub total_items: u32,
    /// `items_included / total_items` as a percentage.
    pub completion_percentage: Percentage,
}

/// Timing summary over the responses that carried a duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionTime {
    pub total_time_ms: u64,
    pub average_time_per_item_ms: f64,
    pub minimum_time_ms: u64,
    pub maximum_time_ms: u64,
}

/// Descriptive statistics over the raw score values.
///
/// Computed by the scoring engine, interpreted by the validity analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePatternStats {
    pub mean: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub unique_values: usize,
}

/// Coarse banding of how much of the scale was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionLevel {
    Complete,
    Partial,
    Minimal,
}

impl CompletionLevel {
    /// Bands a response rate (0.0 to 1.0): >= 0.8 complete, >= 0.5 partial.
    pub fn from_response_rate(rate: f64) -> Self {
        if rate >= 0.8 {
            CompletionLevel::Complete
        } else if rate >= 0.5 {
            CompletionLevel::Partial
        } else {
            CompletionLevel::Minimal
        }
    }
}

/// Response-quality summary attached to every scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Fraction of the scale's items answered (0.0 to 1.0).
    pub response_rate: f64,
    pub completion_level: CompletionLevel,
    /// `1 - stddev/mean` over response times; None without two timed
    /// responses. May be negative for highly erratic pacing.
    pub time_consistency: Option<f64>,
    /// Blend of response rate and time consistency, clamped to [0, 1].
    pub quality_score: f64,
}

/// The immutable outcome of one scoring run.
///
/// Re-scoring produces a new result; results are never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// The headline clinical score (equals `scaled_score`).
    pub total_score: f64,
    /// Plain sum of all answered items' scores.
    pub raw_score: f64,
    /// Raw score transformed by the scale's scoring method.
    pub scaled_score: f64,
    pub completion_percentage: Percentage,
    pub subscale_scores: BTreeMap<String, SubscaleScore>,
    pub response_pattern_stats: ResponsePatternStats,
    pub quality_metrics: QualityMetrics,
    /// None when no response carried timing.
    pub completion_time: Option<CompletionTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_level_bands_at_thresholds() {
        assert_eq!(CompletionLevel::from_response_rate(1.0), CompletionLevel::Complete);
        assert_eq!(CompletionLevel::from_response_rate(0.8), CompletionLevel::Complete);
        assert_eq!(CompletionLevel::from_response_rate(0.79), CompletionLevel::Partial);
        assert_eq!(CompletionLevel::from_response_rate(0.5), CompletionLevel::Partial);
        assert_eq!(CompletionLevel::from_response_rate(0.49), CompletionLevel::Minimal);
        assert_eq!(CompletionLevel::from_response_rate(0.0), CompletionLevel::Minimal);
    }

    #[test]
    fn completion_level_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CompletionLevel::Complete).unwrap(),
            "\"complete\""
        );
    }

    #[test]
    fn subscale_score_serializes_all_fields() {
        let subscale = SubscaleScore {
            score: 6.0,
            items_included: 2,
            total_items: 3,
            completion_percentage: Percentage::from_ratio(2.0, 3.0),
        };
        let json = serde_json::to_string(&subscale).unwrap();
        assert!(json.contains("\"items_included\":2"));
        assert!(json.contains("\"total_items\":3"));
    }
}
