//! InterpretationService port for clinical severity lookup.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::scale::ScaleDefinition;
use crate::domain::scoring::SubscaleScore;

/// Clinical interpretation of a scored assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Severity label from the scale's interpretation table.
    pub severity: String,
    /// Narrative reading of the score for the clinician.
    pub clinical_interpretation: String,
    /// Suggested follow-ups, possibly empty.
    pub recommendations: Vec<String>,
    /// Lookup confidence (0.0 to 1.0).
    pub confidence: f64,
}

/// Maps a total score (and subscale breakdown) to a clinical reading.
///
/// This is an opaque, possibly-failing collaborator: the orchestrator
/// tolerates its failure by proceeding without an interpretation rather
/// than discarding already-computed scores.
#[async_trait]
pub trait InterpretationService: Send + Sync {
    /// Looks up the interpretation for a scored assessment.
    ///
    /// # Errors
    ///
    /// - `DependencyUnavailable` if the lookup cannot be served
    async fn interpret(
        &self,
        scale: &ScaleDefinition,
        total_score: f64,
        subscale_scores: &BTreeMap<String, SubscaleScore>,
    ) -> Result<Interpretation, DomainError>;
}
