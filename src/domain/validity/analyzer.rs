//! Validity Analyzer - Weighted aggregation of the five sub-analyses.
//!
//! `analyze` is total: structurally broken input yields a degraded report
//! carrying the `error` category sentinel, never a panic or an `Err`.

use std::collections::BTreeMap;

use crate::domain::assessment::Response;
use crate::domain::scale::ScaleDefinition;
use crate::domain::scoring::ScoringResult;

use super::report::{
    classify, ValidityCategory, ValidityLevel, ValidityReport, ValidityWarning, WarningSeverity,
    WarningType,
};
use super::{
    CompletionAnalysis, ConsistencyAnalysis, OutlierAnalysis, PatternAnalysis, TimingAnalysis,
};

/// Sub-analysis weights. Unavailable analyses drop out of both the
/// numerator and the denominator of the aggregate.
const PATTERN_WEIGHT: f64 = 0.30;
const TIMING_WEIGHT: f64 = 0.20;
const COMPLETION_WEIGHT: f64 = 0.25;
const CONSISTENCY_WEIGHT: f64 = 0.15;
const OUTLIER_WEIGHT: f64 = 0.10;

/// Completion rate under which the shortfall warning escalates to high.
const COMPLETION_HIGH_WARNING_RATE: f64 = 0.5;

/// Completion rate under which a shortfall warning is raised at all.
const COMPLETION_WARNING_RATE: f64 = 0.8;

/// Agreement rate under which paired items count as inconsistent.
const CONSISTENCY_WARNING_RATE: f64 = 0.5;

/// Pure analysis of response-pattern trustworthiness.
pub struct ValidityAnalyzer;

impl ValidityAnalyzer {
    /// Judges how much the response pattern can be trusted.
    ///
    /// The scoring result must come from the same response set; its
    /// pattern statistics and completion percentage feed the pattern and
    /// completion checks.
    pub fn analyze(
        scale: &ScaleDefinition,
        responses: &BTreeMap<u32, Response>,
        scoring: &ScoringResult,
    ) -> ValidityReport {
        if responses.is_empty() {
            return Self::degraded_report();
        }

        // BTreeMap iteration gives the ordered-by-item-number sequence.
        let scores: Vec<f64> = responses.values().map(|r| r.score).collect();
        let times: Vec<f64> = responses
            .values()
            .filter_map(|r| r.response_time_ms)
            .map(|t| t as f64)
            .collect();
        let answered_items: Vec<u32> = responses.keys().copied().collect();

        let pattern = PatternAnalysis::analyze(&scores, &scoring.response_pattern_stats);
        let timing = TimingAnalysis::analyze(&times);
        let completion = CompletionAnalysis::analyze(
            &answered_items,
            scale.total_items,
            scoring.completion_percentage.as_fraction(),
        );
        let consistency = ConsistencyAnalysis::analyze(scale, responses);
        let outliers = OutlierAnalysis::analyze(&scores);

        let overall_validity_score =
            Self::aggregate(&pattern, &timing, &completion, &consistency, &outliers);
        let (validity_level, validity_category) = classify(overall_validity_score);
        let warnings =
            Self::collect_warnings(&pattern, &timing, &completion, &consistency, &outliers);

        ValidityReport {
            overall_validity_score,
            validity_level,
            validity_category,
            pattern,
            timing,
            completion,
            consistency,
            outliers,
            warnings,
        }
    }

    /// Weighted mean over the available sub-analyses only.
    fn aggregate(
        pattern: &PatternAnalysis,
        timing: &TimingAnalysis,
        completion: &CompletionAnalysis,
        consistency: &ConsistencyAnalysis,
        outliers: &OutlierAnalysis,
    ) -> f64 {
        let components = [
            (pattern.available, pattern.validity_score, PATTERN_WEIGHT),
            (timing.available, timing.validity_score, TIMING_WEIGHT),
            (
                completion.available,
                completion.validity_score,
                COMPLETION_WEIGHT,
            ),
            (
                consistency.available,
                consistency.validity_score,
                CONSISTENCY_WEIGHT,
            ),
            (outliers.available, outliers.validity_score, OUTLIER_WEIGHT),
        ];

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (available, score, weight) in components {
            if available {
                weighted_sum += score * weight;
                weight_sum += weight;
            }
        }

        if weight_sum == 0.0 {
            return 0.0;
        }
        (weighted_sum / weight_sum).clamp(0.0, 1.0)
    }

    /// Derives the deterministic warning list from the analysis flags.
    fn collect_warnings(
        pattern: &PatternAnalysis,
        timing: &TimingAnalysis,
        completion: &CompletionAnalysis,
        consistency: &ConsistencyAnalysis,
        outliers: &OutlierAnalysis,
    ) -> Vec<ValidityWarning> {
        let mut warnings = Vec::new();

        if pattern.constant_response {
            warnings.push(ValidityWarning::new(
                WarningType::ConstantResponse,
                WarningSeverity::High,
                "Every answered item received the same score",
                "Review the administration with the patient; the scale may need to be repeated",
            ));
        }
        if pattern.zigzag_pattern {
            warnings.push(ValidityWarning::new(
                WarningType::ZigzagPattern,
                WarningSeverity::Medium,
                "Scores alternate in a mechanical high-low pattern",
                "Check for careless or random responding before relying on the total score",
            ));
        }
        if pattern.straight_line_pattern {
            warnings.push(ValidityWarning::new(
                WarningType::StraightLinePattern,
                WarningSeverity::Medium,
                "A long run of identical answers dominates the response sequence",
                "Confirm the patient was engaging with item content rather than answer position",
            ));
        }
        if pattern.extreme_response_bias {
            warnings.push(ValidityWarning::new(
                WarningType::ExtremeResponseBias,
                WarningSeverity::Medium,
                "Most answers sit at the extremes of the response range",
                "Consider whether an extreme response style is inflating or masking severity",
            ));
        }
        if timing.suspicious_speed {
            warnings.push(ValidityWarning::new(
                WarningType::SuspiciousSpeed,
                WarningSeverity::Medium,
                "Answers arrived faster than the items can plausibly be read",
                "Treat the scores as provisional and repeat the administration if speed cannot be explained",
            ));
        }
        if completion.available && completion.completion_rate < COMPLETION_WARNING_RATE {
            let severity = if completion.completion_rate < COMPLETION_HIGH_WARNING_RATE {
                WarningSeverity::High
            } else {
                WarningSeverity::Medium
            };
            warnings.push(ValidityWarning::new(
                WarningType::LowCompletion,
                severity,
                "Too few items were answered for a dependable total score",
                "Collect the missing responses before interpreting the results",
            ));
        }
        if completion.premature_termination {
            warnings.push(ValidityWarning::new(
                WarningType::PrematureTermination,
                WarningSeverity::Medium,
                "Responding stopped well before the end of the scale",
                "Check whether the administration was interrupted",
            ));
        }
        if outliers.excessive {
            warnings.push(ValidityWarning::new(
                WarningType::ExcessiveOutliers,
                WarningSeverity::Low,
                "An unusual share of item scores falls outside the expected spread",
                "Inspect the flagged items for data-entry or keying errors",
            ));
        }
        if consistency.available && consistency.agreement_rate < CONSISTENCY_WARNING_RATE {
            warnings.push(ValidityWarning::new(
                WarningType::InconsistentResponses,
                WarningSeverity::Medium,
                "Paired consistency items disagree more often than they agree",
                "Probe the discrepant item pairs with the patient",
            ));
        }

        warnings
    }

    /// The sentinel report returned when analysis cannot run at all.
    fn degraded_report() -> ValidityReport {
        ValidityReport {
            overall_validity_score: 0.0,
            validity_level: ValidityLevel::VeryLow,
            validity_category: ValidityCategory::Error,
            pattern: PatternAnalysis::unavailable(),
            timing: TimingAnalysis::unavailable(),
            completion: CompletionAnalysis::unavailable(),
            consistency: ConsistencyAnalysis::unavailable(),
            outliers: OutlierAnalysis::unavailable(),
            warnings: vec![ValidityWarning::new(
                WarningType::DegradedAnalysis,
                WarningSeverity::High,
                "Validity analysis could not be computed for this response set",
                "Verify the assessment has recorded responses and re-run scoring",
            )],
        }
    }
}
