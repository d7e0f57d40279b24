//! Application layer - Use-case orchestration over the domain.

pub mod handlers;

pub use handlers::{AssessmentScoringOutcome, ScoringHandler};
