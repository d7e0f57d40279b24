//! ScoringHandler - Orchestrates scoring, validity analysis, and
//! interpretation into one immutable outcome.
//!
//! The pipeline is ordered: basic scoring first (failure is fatal and
//! nothing is returned), then validity analysis (degradation is flagged,
//! never fatal), then the external interpretation lookup (failure is
//! tolerated; the scores stand).
//!
//! # Concurrency
//!
//! Scoring reads a snapshot of one assessment's responses. The handler
//! does no internal locking: callers must serialize writes to an
//! assessment with any in-flight scoring pass over it (one writer per
//! assessment at a time). Independent assessments can be scored freely in
//! parallel.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::assessment::Assessment;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scale::ScaleDefinition;
use crate::domain::scoring::{ScoringEngine, ScoringResult};
use crate::domain::validity::{ValidityAnalyzer, ValidityReport};
use crate::ports::{Interpretation, InterpretationService};

/// Everything one scoring run produces. Immutable; re-scoring builds a
/// new outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScoringOutcome {
    pub scoring: ScoringResult,
    pub validity: ValidityReport,
    /// None when the interpretation service was unavailable or holds no
    /// table for this scale.
    pub interpretation: Option<Interpretation>,
}

/// Orchestrates the scoring pipeline for one assessment at a time.
pub struct ScoringHandler {
    interpretation: Arc<dyn InterpretationService>,
}

impl ScoringHandler {
    /// Creates a new ScoringHandler.
    pub fn new(interpretation: Arc<dyn InterpretationService>) -> Self {
        Self { interpretation }
    }

    /// Scores an assessment without mutating it.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the scale does not match the assessment, the
    ///   definition is malformed, or the responses cannot be scored
    pub async fn score_assessment(
        &self,
        assessment: &Assessment,
        scale: &ScaleDefinition,
    ) -> Result<AssessmentScoringOutcome, DomainError> {
        if assessment.scale_id() != &scale.id {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                format!(
                    "Assessment was administered against scale '{}', not '{}'",
                    assessment.scale_id(),
                    scale.id
                ),
            )
            .with_detail("assessment_id", assessment.id().to_string()));
        }

        let scoring = ScoringEngine::score(scale, assessment.responses())?;

        let validity = ValidityAnalyzer::analyze(scale, assessment.responses(), &scoring);
        if validity.is_degraded() {
            warn!(
                assessment_id = %assessment.id(),
                scale_id = %scale.id,
                "Validity analysis degraded; scores stand but cannot be trusted blindly"
            );
        }

        let interpretation = match self
            .interpretation
            .interpret(scale, scoring.total_score, &scoring.subscale_scores)
            .await
        {
            Ok(interpretation) => Some(interpretation),
            Err(err) => {
                warn!(
                    assessment_id = %assessment.id(),
                    scale_id = %scale.id,
                    error = %err,
                    "Interpretation lookup failed; proceeding without interpretation"
                );
                None
            }
        };

        debug!(
            assessment_id = %assessment.id(),
            scale_id = %scale.id,
            total_score = scoring.total_score,
            validity_category = %validity.validity_category,
            "Scored assessment"
        );

        Ok(AssessmentScoringOutcome {
            scoring,
            validity,
            interpretation,
        })
    }

    /// Scores an assessment and drives the `complete` transition.
    ///
    /// This is the only path by which scoring completes an assessment;
    /// the transition runs only after the full pipeline succeeded.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` as for [`Self::score_assessment`]
    /// - `InvalidState` if the assessment is below the completion
    ///   threshold or already terminal
    pub async fn complete_assessment(
        &self,
        assessment: &mut Assessment,
        scale: &ScaleDefinition,
    ) -> Result<AssessmentScoringOutcome, DomainError> {
        let outcome = self.score_assessment(assessment, scale).await?;
        assessment.complete(&outcome.scoring)?;

        debug!(
            assessment_id = %assessment.id(),
            scale_id = %scale.id,
            "Completed assessment after scoring"
        );

        Ok(outcome)
    }
}
