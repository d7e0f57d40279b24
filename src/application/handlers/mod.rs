//! Application handlers.

pub mod scoring;

pub use scoring::{AssessmentScoringOutcome, ScoringHandler};
