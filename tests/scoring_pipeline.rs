//! Integration tests for the end-to-end scoring pipeline.
//!
//! These tests verify the full flow:
//! 1. Responses are recorded on an Assessment through its lifecycle
//! 2. ScoringHandler runs basic scoring, subscale scoring, and validity
//!    analysis in order
//! 3. The interpretation lookup enriches the outcome, or is tolerated
//!    when it fails
//! 4. Completion freezes the assessment
//!
//! Uses in-memory interpretation adapters to exercise the pattern without
//! external dependencies.

use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clinimetrics::adapters::{SeverityBand, ThresholdInterpreter};
use clinimetrics::application::ScoringHandler;
use clinimetrics::domain::assessment::Assessment;
use clinimetrics::domain::foundation::{
    AdministratorId, AssessmentId, AssessmentStatus, DomainError, ErrorCode, PatientId, ScaleId,
};
use clinimetrics::domain::scale::{
    ScaleDefinition, ScoreRange, ScoringMethod, SubscaleDefinition,
};
use clinimetrics::domain::scoring::SubscaleScore;
use clinimetrics::domain::validity::{ValidityCategory, WarningType};
use clinimetrics::ports::{Interpretation, InterpretationService};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Interpretation service that fails every call and counts the attempts.
struct FlakyInterpreter {
    calls: AtomicUsize,
}

impl FlakyInterpreter {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InterpretationService for FlakyInterpreter {
    async fn interpret(
        &self,
        _scale: &ScaleDefinition,
        _total_score: f64,
        _subscale_scores: &BTreeMap<String, SubscaleScore>,
    ) -> Result<Interpretation, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::new(
            ErrorCode::DependencyUnavailable,
            "Interpretation backend unreachable",
        ))
    }
}

fn nine_item_sum_scale() -> ScaleDefinition {
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
            SeverityBand::new(20.0, "severe", "Severe depressive symptoms"),
        ],
    )
}

fn new_assessment(scale: &ScaleDefinition) -> Assessment {
    Assessment::new(
        AssessmentId::new(),
        scale,
        PatientId::new(),
        AdministratorId::new(),
    )
    .unwrap()
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test]
async fn varied_full_administration_scores_and_reads_as_reliable() {
    let scale = nine_item_sum_scale();
    let mut assessment = new_assessment(&scale);

    let scores = [0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0];
    for (i, score) in scores.iter().enumerate() {
        assessment
            .add_response(i as u32 + 1, json!(*score), *score, None)
            .unwrap();
    }

    let handler = ScoringHandler::new(Arc::new(phq9_interpreter()));
    let outcome = handler
        .complete_assessment(&mut assessment, &scale)
        .await
        .unwrap();

    // Scores
    assert_eq!(outcome.scoring.total_score, 12.0);
    assert_eq!(outcome.scoring.raw_score, 12.0);
    assert_eq!(outcome.scoring.completion_percentage.value(), 100.0);
    assert!(outcome.scoring.completion_time.is_none());

    // Validity: varied answers, full completion, nothing flagged
    assert_eq!(outcome.validity.pattern.validity_score, 1.0);
    assert!(matches!(
        outcome.validity.validity_category,
        ValidityCategory::Reliable | ValidityCategory::Acceptable
    ));
    assert!(outcome.validity.warnings.is_empty());

    // Interpretation from the band table
    let interpretation = outcome.interpretation.unwrap();
    assert_eq!(interpretation.severity, "moderate");

    // Lifecycle
    assert_eq!(assessment.status(), AssessmentStatus::Completed);
    assert!(assessment.completed_at().is_some());
}

#[tokio::test]
async fn subscale_breakdown_follows_item_partition() {
    let scale = ScaleDefinition::builder(
        ScaleId::new("mood-screen").unwrap(),
        "Mood Screen",
        6,
        ScoreRange::new(0.0, 24.0).unwrap(),
        ScoringMethod::Sum,
    )
    .subscale(SubscaleDefinition::new(
        "affective",
        "Affective",
        [1, 3, 5],
        ScoreRange::new(0.0, 12.0).unwrap(),
    ))
    .subscale(SubscaleDefinition::new(
        "somatic",
        "Somatic",
        [2, 4, 6],
        ScoreRange::new(0.0, 12.0).unwrap(),
    ))
    .build()
    .unwrap();

    let mut assessment = new_assessment(&scale);
    // Item 5 left unanswered
    for (item, score) in [(1, 2.0), (2, 1.0), (3, 4.0), (4, 0.0), (6, 3.0)] {
        assessment
            .add_response(item, json!(score), score, None)
            .unwrap();
    }

    let handler = ScoringHandler::new(Arc::new(phq9_interpreter()));
    let outcome = handler.score_assessment(&assessment, &scale).await.unwrap();

    let affective = &outcome.scoring.subscale_scores["affective"];
    assert_eq!(affective.score, 6.0);
    assert_eq!(affective.items_included, 2);
    assert_eq!(affective.total_items, 3);
    assert!((affective.completion_percentage.value() - 66.6667).abs() < 0.01);

    let somatic = &outcome.scoring.subscale_scores["somatic"];
    assert_eq!(somatic.score, 4.0);
    assert_eq!(somatic.items_included, 3);

    // No table registered for this scale: scores survive without an
    // interpretation
    assert!(outcome.interpretation.is_none());
}

#[tokio::test]
async fn interpretation_outage_never_discards_scores() {
    let scale = nine_item_sum_scale();
    let mut assessment = new_assessment(&scale);
    for item in 1..=9 {
        assessment
            .add_response(item, json!(2), 2.0, Some(2_000 + u64::from(item) * 100))
            .unwrap();
    }

    let interpreter = Arc::new(FlakyInterpreter::new());
    let handler = ScoringHandler::new(interpreter.clone());

    let outcome = handler.score_assessment(&assessment, &scale).await.unwrap();
    assert_eq!(interpreter.call_count(), 1);
    assert!(outcome.interpretation.is_none());
    assert_eq!(outcome.scoring.total_score, 18.0);
    // Timing was recorded, so the timing analysis participates
    assert!(outcome.validity.timing.available);
    assert_ne!(outcome.validity.validity_category, ValidityCategory::Error);
}

#[tokio::test]
async fn careless_constant_answers_are_flagged_before_the_clinician_reads_them() {
    let scale = nine_item_sum_scale();
    let mut assessment = new_assessment(&scale);
    for item in 1..=9 {
        // Same answer every time, far too quickly
        assessment
            .add_response(item, json!(3), 3.0, Some(180))
            .unwrap();
    }

    let handler = ScoringHandler::new(Arc::new(phq9_interpreter()));
    let outcome = handler.score_assessment(&assessment, &scale).await.unwrap();

    assert!(outcome.validity.pattern.constant_response);
    assert!(outcome.validity.timing.suspicious_speed);
    assert!(matches!(
        outcome.validity.validity_category,
        ValidityCategory::Questionable | ValidityCategory::Unreliable
    ));

    let types: Vec<WarningType> = outcome
        .validity
        .warnings
        .iter()
        .map(|w| w.warning_type)
        .collect();
    assert!(types.contains(&WarningType::ConstantResponse));
    assert!(types.contains(&WarningType::SuspiciousSpeed));
}

#[tokio::test]
async fn partial_administration_scores_but_cannot_complete() {
    let scale = nine_item_sum_scale();
    let mut assessment = new_assessment(&scale);
    // 6 of 9 answered sequentially, then abandoned
    for item in 1..=6 {
        assessment
            .add_response(item, json!(1), 1.0, None)
            .unwrap();
    }

    let handler = ScoringHandler::new(Arc::new(phq9_interpreter()));

    let outcome = handler.score_assessment(&assessment, &scale).await.unwrap();
    assert!(outcome.validity.completion.premature_termination);
    assert!(!assessment.can_complete());

    let err = handler
        .complete_assessment(&mut assessment, &scale)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(assessment.status(), AssessmentStatus::InProgress);
}

#[tokio::test]
async fn cancelled_assessment_is_frozen_for_good() {
    let scale = nine_item_sum_scale();
    let mut assessment = new_assessment(&scale);
    assessment.add_response(1, json!(1), 1.0, None).unwrap();
    assessment.cancel().unwrap();

    let err = assessment.add_response(2, json!(1), 1.0, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);

    // Scoring a cancelled assessment is still legal; completing is not
    let handler = ScoringHandler::new(Arc::new(phq9_interpreter()));
    let outcome = handler.score_assessment(&assessment, &scale).await.unwrap();
    assert_eq!(outcome.scoring.raw_score, 1.0);

    let err = handler
        .complete_assessment(&mut assessment, &scale)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert_eq!(assessment.status(), AssessmentStatus::Cancelled);
}
