//! In-process interpretation lookup backed by severity band tables.
//!
//! Suitable for scales whose interpretation is a plain cutoff table (most
//! screening instruments). Normative percentile or T-score interpretation
//! needs tables this adapter does not hold; scales without a registered
//! band table degrade to `DependencyUnavailable` and the orchestrator
//! proceeds without an interpretation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scale::ScaleDefinition;
use crate::domain::scoring::SubscaleScore;
use crate::ports::{Interpretation, InterpretationService};

/// One severity band: scores at or above `cutoff` (and below the next
/// band's cutoff) read as `severity`.
#[derive(Debug, Clone)]
pub struct SeverityBand {
    pub cutoff: f64,
    pub severity: String,
    pub interpretation: String,
    pub recommendations: Vec<String>,
}

impl SeverityBand {
    /// Creates a band without recommendations.
    pub fn new(
        cutoff: f64,
        severity: impl Into<String>,
        interpretation: impl Into<String>,
    ) -> Self {
        Self {
            cutoff,
            severity: severity.into(),
            interpretation: interpretation.into(),
            recommendations: Vec::new(),
        }
    }

    /// Adds a recommendation to the band.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }
}

/// Band-table interpretation for the scales registered with it.
#[derive(Debug, Default)]
pub struct ThresholdInterpreter {
    /// Band tables keyed by scale ID, each sorted ascending by cutoff.
    bands: HashMap<String, Vec<SeverityBand>>,
}

impl ThresholdInterpreter {
    /// Creates an interpreter with no registered scales.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a band table for a scale.
    ///
    /// Bands are sorted by cutoff; the band whose cutoff is the highest
    /// one not exceeding the total score wins.
    pub fn register_scale(
        mut self,
        scale_id: impl Into<String>,
        mut bands: Vec<SeverityBand>,
    ) -> Self {
        bands.sort_by(|a, b| a.cutoff.total_cmp(&b.cutoff));
        self.bands.insert(scale_id.into(), bands);
        self
    }

    fn band_for(&self, scale_id: &str, total_score: f64) -> Option<&SeverityBand> {
        self.bands
            .get(scale_id)?
            .iter()
            .rev()
            .find(|band| total_score >= band.cutoff)
    }
}

#[async_trait]
impl InterpretationService for ThresholdInterpreter {
    async fn interpret(
        &self,
        scale: &ScaleDefinition,
        total_score: f64,
        _subscale_scores: &BTreeMap<String, SubscaleScore>,
    ) -> Result<Interpretation, DomainError> {
        let band = self.band_for(scale.id.as_str(), total_score).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DependencyUnavailable,
                format!("No interpretation table registered for scale '{}'", scale.id),
            )
            .with_detail("scale_id", scale.id.as_str())
        })?;

        Ok(Interpretation {
            severity: band.severity.clone(),
            clinical_interpretation: band.interpretation.clone(),
            recommendations: band.recommendations.clone(),
            confidence: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ScaleId;
    use crate::domain::scale::{ScoreRange, ScoringMethod};

    fn phq9_scale() -> ScaleDefinition {
        ScaleDefinition::builder(
            ScaleId::new("phq-9").unwrap(),
            "Patient Health Questionnaire-9",
            9,
            ScoreRange::new(0.0, 27.0).unwrap(),
            ScoringMethod::Sum,
        )
        .build()
        .unwrap()
    }

    fn phq9_interpreter() -> ThresholdInterpreter {
        ThresholdInterpreter::new().register_scale(
            "phq-9",
            vec![
                SeverityBand::new(0.0, "minimal", "Minimal depressive symptoms"),
                SeverityBand::new(5.0, "mild", "Mild depressive symptoms"),
                SeverityBand::new(10.0, "moderate", "Moderate depressive symptoms")
                    .with_recommendation("Consider a treatment plan review"),
                SeverityBand::new(15.0, "moderately severe", "Moderately severe symptoms"),
                SeverityBand::new(20.0, "severe", "Severe depressive symptoms")
                    .with_recommendation("Active treatment is warranted"),
            ],
        )
    }

    #[tokio::test]
    async fn score_lands_in_matching_band() {
        let interpreter = phq9_interpreter();
        let result = interpreter
            .interpret(&phq9_scale(), 12.0, &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(result.severity, "moderate");
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.confidence, 1.0);
    }

    #[tokio::test]
    async fn cutoff_boundary_belongs_to_upper_band() {
        let interpreter = phq9_interpreter();
        let result = interpreter
            .interpret(&phq9_scale(), 15.0, &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(result.severity, "moderately severe");
    }

    #[tokio::test]
    async fn zero_score_reads_as_minimal() {
        let interpreter = phq9_interpreter();
        let result = interpreter
            .interpret(&phq9_scale(), 0.0, &BTreeMap::new())
            .await
            .unwrap();

        assert_eq!(result.severity, "minimal");
    }

    #[tokio::test]
    async fn unregistered_scale_is_dependency_unavailable() {
        let interpreter = ThresholdInterpreter::new();
        let err = interpreter
            .interpret(&phq9_scale(), 12.0, &BTreeMap::new())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DependencyUnavailable);
        assert_eq!(err.details.get("scale_id"), Some(&"phq-9".to_string()));
    }

    #[tokio::test]
    async fn bands_registered_out_of_order_still_resolve() {
        let interpreter = ThresholdInterpreter::new().register_scale(
            "gad-7",
            vec![
                SeverityBand::new(10.0, "moderate", "Moderate anxiety"),
                SeverityBand::new(0.0, "minimal", "Minimal anxiety"),
                SeverityBand::new(5.0, "mild", "Mild anxiety"),
            ],
        );
        let scale = ScaleDefinition::builder(
            ScaleId::new("gad-7").unwrap(),
            "GAD-7",
            7,
            ScoreRange::new(0.0, 21.0).unwrap(),
            ScoringMethod::Sum,
        )
        .build()
        .unwrap();

        let result = interpreter
            .interpret(&scale, 7.0, &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(result.severity, "mild");
    }
}
