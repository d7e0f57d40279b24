//! Scoring orchestration.

mod scoring_handler;

pub use scoring_handler::{AssessmentScoringOutcome, ScoringHandler};
