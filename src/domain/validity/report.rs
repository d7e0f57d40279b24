//! Validity report types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    CompletionAnalysis, ConsistencyAnalysis, OutlierAnalysis, PatternAnalysis, TimingAnalysis,
};

/// Graded confidence in the response pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityLevel {
    High,
    Moderate,
    Low,
    VeryLow,
}

/// Clinical framing of the same judgment.
///
/// `Error` is the degraded-analysis sentinel: the report could not be
/// computed meaningfully and callers must branch on it rather than read
/// the other fields as a healthy result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityCategory {
    Reliable,
    Acceptable,
    Questionable,
    Unreliable,
    Error,
}

impl fmt::Display for ValidityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidityCategory::Reliable => "reliable",
            ValidityCategory::Acceptable => "acceptable",
            ValidityCategory::Questionable => "questionable",
            ValidityCategory::Unreliable => "unreliable",
            ValidityCategory::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Bands an overall validity score into level and category.
pub fn classify(overall_score: f64) -> (ValidityLevel, ValidityCategory) {
    if overall_score >= 0.8 {
        (ValidityLevel::High, ValidityCategory::Reliable)
    } else if overall_score >= 0.6 {
        (ValidityLevel::Moderate, ValidityCategory::Acceptable)
    } else if overall_score >= 0.4 {
        (ValidityLevel::Low, ValidityCategory::Questionable)
    } else {
        (ValidityLevel::VeryLow, ValidityCategory::Unreliable)
    }
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    ConstantResponse,
    ZigzagPattern,
    StraightLinePattern,
    ExtremeResponseBias,
    SuspiciousSpeed,
    LowCompletion,
    PrematureTermination,
    ExcessiveOutliers,
    InconsistentResponses,
    DegradedAnalysis,
}

/// How seriously a warning should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Low,
    Medium,
    High,
}

/// One deterministic warning derived from an analysis flag.
///
/// `warning_type` and `severity` are contractual; message and
/// recommendation wording is presentation and may be localized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityWarning {
    pub warning_type: WarningType,
    pub severity: WarningSeverity,
    pub message: String,
    pub recommendation: String,
}

impl ValidityWarning {
    /// Creates a warning.
    pub fn new(
        warning_type: WarningType,
        severity: WarningSeverity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            warning_type,
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }
}

/// The immutable outcome of one validity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityReport {
    /// Weighted blend of the available sub-analyses, in [0, 1].
    pub overall_validity_score: f64,
    pub validity_level: ValidityLevel,
    pub validity_category: ValidityCategory,
    pub pattern: PatternAnalysis,
    pub timing: TimingAnalysis,
    pub completion: CompletionAnalysis,
    pub consistency: ConsistencyAnalysis,
    pub outliers: OutlierAnalysis,
    pub warnings: Vec<ValidityWarning>,
}

impl ValidityReport {
    /// Returns true if the analysis could not be computed meaningfully.
    pub fn is_degraded(&self) -> bool {
        self.validity_category == ValidityCategory::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bands_at_thresholds() {
        assert_eq!(
            classify(0.85),
            (ValidityLevel::High, ValidityCategory::Reliable)
        );
        assert_eq!(
            classify(0.8),
            (ValidityLevel::High, ValidityCategory::Reliable)
        );
        assert_eq!(
            classify(0.79),
            (ValidityLevel::Moderate, ValidityCategory::Acceptable)
        );
        assert_eq!(
            classify(0.6),
            (ValidityLevel::Moderate, ValidityCategory::Acceptable)
        );
        assert_eq!(
            classify(0.59),
            (ValidityLevel::Low, ValidityCategory::Questionable)
        );
        assert_eq!(
            classify(0.4),
            (ValidityLevel::Low, ValidityCategory::Questionable)
        );
        assert_eq!(
            classify(0.39),
            (ValidityLevel::VeryLow, ValidityCategory::Unreliable)
        );
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(WarningSeverity::Low < WarningSeverity::Medium);
        assert!(WarningSeverity::Medium < WarningSeverity::High);
    }

    #[test]
    fn category_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ValidityCategory::Unreliable).unwrap(),
            "\"unreliable\""
        );
        assert_eq!(
            serde_json::to_string(&ValidityLevel::VeryLow).unwrap(),
            "\"very_low\""
        );
    }

    #[test]
    fn warning_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&WarningType::ConstantResponse).unwrap(),
            "\"constant_response\""
        );
    }
}
