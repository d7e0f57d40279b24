//! Validity module - Statistical trustworthiness of a response pattern.
//!
//! Five independent sub-analyses (pattern, timing, completion, consistency,
//! outliers) each produce a score in [0, 1]; the analyzer blends the
//! available ones into an overall judgment and a deterministic warning
//! list.

mod analyzer;
mod completion;
mod consistency;
mod outliers;
mod pattern;
mod report;
mod timing;

pub use analyzer::ValidityAnalyzer;
pub use completion::CompletionAnalysis;
pub use consistency::ConsistencyAnalysis;
pub use outliers::OutlierAnalysis;
pub use pattern::PatternAnalysis;
pub use report::{
    ValidityCategory, ValidityLevel, ValidityReport, ValidityWarning, WarningSeverity, WarningType,
};
pub use timing::TimingAnalysis;
