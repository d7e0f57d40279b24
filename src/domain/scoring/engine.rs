//! Scoring Engine - Pure computation of scores from responses.
//!
//! `score` is a deterministic function of (scale definition, responses).
//! No I/O, no side effects; interpreting the numbers is the validity
//! analyzer's and the interpretation service's job.

use std::collections::BTreeMap;

use crate::domain::assessment::Response;
use crate::domain::foundation::{stats, DomainError, ErrorCode, Percentage};
use crate::domain::scale::{ScaleDefinition, ScoringMethod};

use super::{
    CompletionLevel, CompletionTime, QualityMetrics, ResponsePatternStats, ScoringResult,
    SubscaleScore,
};

/// Weight of the response rate in the blended quality score.
const QUALITY_RESPONSE_WEIGHT: f64 = 0.6;

/// Weight of time consistency in the blended quality score.
const QUALITY_TIMING_WEIGHT: f64 = 0.4;

/// Pure scoring of a response set against a scale definition.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores a response set.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the scale definition is malformed, the response
    ///   set is empty, a response's score is not finite, or an item number
    ///   falls outside the scale. The offending item is named in the error
    ///   details.
    pub fn score(
        scale: &ScaleDefinition,
        responses: &BTreeMap<u32, Response>,
    ) -> Result<ScoringResult, DomainError> {
        scale.validate()?;
        Self::validate_responses(scale, responses)?;

        // BTreeMap iteration gives the ordered-by-item-number sequence.
        let scores: Vec<f64> = responses.values().map(|r| r.score).collect();
        let items_processed = scores.len();

        let completion_percentage =
            Percentage::from_ratio(items_processed as f64, f64::from(scale.total_items));

        let raw_score: f64 = scores.iter().sum();
        let scaled_score = match scale.scoring_method {
            ScoringMethod::Sum => raw_score,
            ScoringMethod::Average => raw_score / items_processed.max(1) as f64,
            ScoringMethod::Weighted => responses
                .values()
                .map(|r| r.score * scale.item_weight(r.item_number))
                .sum(),
        };

        let subscale_scores = Self::score_subscales(scale, responses);
        let completion_time = Self::completion_time(responses);
        let response_pattern_stats = ResponsePatternStats {
            mean: stats::mean(&scores),
            std_dev: stats::std_dev(&scores),
            variance: stats::variance(&scores),
            unique_values: stats::unique_count(&scores),
        };
        let quality_metrics =
            Self::quality_metrics(completion_percentage.as_fraction(), responses);

        Ok(ScoringResult {
            total_score: scaled_score,
            raw_score,
            scaled_score,
            completion_percentage,
            subscale_scores,
            response_pattern_stats,
            quality_metrics,
            completion_time,
        })
    }

    /// Rejects response sets the engine cannot score.
    fn validate_responses(
        scale: &ScaleDefinition,
        responses: &BTreeMap<u32, Response>,
    ) -> Result<(), DomainError> {
        if responses.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "Cannot score an assessment with no responses",
            ));
        }

        for response in responses.values() {
            if !scale.contains_item(response.item_number) {
                return Err(DomainError::invalid_input_for_item(
                    response.item_number,
                    format!(
                        "Item {} is outside the scale's range 1..={}",
                        response.item_number, scale.total_items
                    ),
                ));
            }
            if !response.score.is_finite() {
                return Err(DomainError::invalid_input_for_item(
                    response.item_number,
                    format!("Response to item {} has no numeric score", response.item_number),
                ));
            }
        }

        Ok(())
    }

    /// Sums each subscale over the responses in its item set.
    ///
    /// A subscale with no answered items scores 0 at 0% completion.
    fn score_subscales(
        scale: &ScaleDefinition,
        responses: &BTreeMap<u32, Response>,
    ) -> BTreeMap<String, SubscaleScore> {
        scale
            .subscales
            .iter()
            .map(|subscale| {
                let answered: Vec<f64> = subscale
                    .items
                    .iter()
                    .filter_map(|item| responses.get(item))
                    .map(|r| r.score)
                    .collect();

                let items_included = answered.len() as u32;
                let total_items = subscale.items.len() as u32;

                (
                    subscale.id.clone(),
                    SubscaleScore {
                        score: answered.iter().sum(),
                        items_included,
                        total_items,
                        completion_percentage: Percentage::from_ratio(
                            f64::from(items_included),
                            f64::from(total_items),
                        ),
                    },
                )
            })
            .collect()
    }

    /// Aggregates timing over the responses that carried a duration.
    fn completion_time(responses: &BTreeMap<u32, Response>) -> Option<CompletionTime> {
        let times: Vec<u64> = responses
            .values()
            .filter_map(|r| r.response_time_ms)
            .collect();

        if times.is_empty() {
            return None;
        }

        let total: u64 = times.iter().sum();
        Some(CompletionTime {
            total_time_ms: total,
            average_time_per_item_ms: total as f64 / times.len() as f64,
            minimum_time_ms: times.iter().copied().fold(u64::MAX, u64::min),
            maximum_time_ms: times.iter().copied().fold(0, u64::max),
        })
    }

    /// Blends response rate with pacing consistency.
    fn quality_metrics(response_rate: f64, responses: &BTreeMap<u32, Response>) -> QualityMetrics {
        let times: Vec<f64> = responses
            .values()
            .filter_map(|r| r.response_time_ms)
            .map(|t| t as f64)
            .collect();

        let time_consistency = if times.len() >= 2 {
            stats::coefficient_of_variation(&times).map(|cv| 1.0 - cv)
        } else {
            None
        };

        let quality_score = match time_consistency {
            Some(consistency) => {
                (QUALITY_RESPONSE_WEIGHT * response_rate + QUALITY_TIMING_WEIGHT * consistency)
                    .clamp(0.0, 1.0)
            }
            None => response_rate.clamp(0.0, 1.0),
        };

        QualityMetrics {
            response_rate,
            completion_level: CompletionLevel::from_response_rate(response_rate),
            time_consistency,
            quality_score,
        }
    }
}
