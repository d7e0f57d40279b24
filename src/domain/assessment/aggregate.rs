//! Assessment aggregate entity.
//!
//! An assessment is one administration of a scale to a patient: it owns the
//! recorded responses and the lifecycle state machine that governs when
//! scoring may run.
//!
//! # Ownership
//!
//! Assessments reference their scale by ID and snapshot its item count at
//! creation. Scale definitions are managed by the external catalog; scoring
//! and validity results are derived value objects owned by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{
    AdministratorId, AssessmentId, AssessmentStatus, DomainError, PatientId, Percentage, ScaleId,
    Timestamp,
};
use crate::domain::scale::ScaleDefinition;
use crate::domain::scoring::ScoringResult;

use super::Response;

/// Minimum completion percentage before an assessment may complete.
///
/// This is a hard business rule, not a tunable.
pub const COMPLETION_THRESHOLD: f64 = 80.0;

/// Idle minutes after which a non-terminal assessment counts as expired.
pub const DEFAULT_MAX_IDLE_MINUTES: i64 = 60;

/// Assessment aggregate - one administration of a scale to a patient.
///
/// # Invariants
///
/// - `completed_at` is set exactly when status is `Completed`
/// - responses are immutable once status is terminal
/// - every recorded item number lies in `[1, total_items]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Unique identifier for this administration.
    id: AssessmentId,

    /// The scale being administered.
    scale_id: ScaleId,

    /// The patient answering.
    patient_id: PatientId,

    /// The clinician administering.
    administrator_id: AdministratorId,

    /// Item count of the referenced scale, snapshotted at creation.
    total_items: u32,

    /// Recorded responses keyed by item number.
    responses: BTreeMap<u32, Response>,

    /// Current lifecycle status.
    status: AssessmentStatus,

    /// When the administration was created.
    started_at: Timestamp,

    /// When a response was last recorded (or the administration created).
    last_activity_at: Timestamp,

    /// When the administration completed, if it has.
    completed_at: Option<Timestamp>,
}

impl Assessment {
    /// Create a new draft assessment for the given scale.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the scale definition fails structural validation
    pub fn new(
        id: AssessmentId,
        scale: &ScaleDefinition,
        patient_id: PatientId,
        administrator_id: AdministratorId,
    ) -> Result<Self, DomainError> {
        scale.validate()?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            scale_id: scale.id.clone(),
            patient_id,
            administrator_id,
            total_items: scale.total_items,
            responses: BTreeMap::new(),
            status: AssessmentStatus::Draft,
            started_at: now,
            last_activity_at: now,
            completed_at: None,
        })
    }

    /// Reconstitute an assessment from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AssessmentId,
        scale_id: ScaleId,
        patient_id: PatientId,
        administrator_id: AdministratorId,
        total_items: u32,
        responses: BTreeMap<u32, Response>,
        status: AssessmentStatus,
        started_at: Timestamp,
        last_activity_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            scale_id,
            patient_id,
            administrator_id,
            total_items,
            responses,
            status,
            started_at,
            last_activity_at,
            completed_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the assessment ID.
    pub fn id(&self) -> &AssessmentId {
        &self.id
    }

    /// Returns the administered scale's ID.
    pub fn scale_id(&self) -> &ScaleId {
        &self.scale_id
    }

    /// Returns the patient's ID.
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    /// Returns the administering clinician's ID.
    pub fn administrator_id(&self) -> &AdministratorId {
        &self.administrator_id
    }

    /// Returns the scale's item count as snapshotted at creation.
    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Returns the recorded responses keyed by item number.
    pub fn responses(&self) -> &BTreeMap<u32, Response> {
        &self.responses
    }

    /// Returns the response for an item, if recorded.
    pub fn response(&self, item_number: u32) -> Option<&Response> {
        self.responses.get(&item_number)
    }

    /// Returns the number of answered items.
    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    /// Returns the current lifecycle status.
    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    /// Returns when the administration was created.
    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Returns when a response was last recorded.
    pub fn last_activity_at(&self) -> &Timestamp {
        &self.last_activity_at
    }

    /// Returns when the administration completed, if it has.
    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// Percentage of the scale's items currently answered.
    pub fn completion_percentage(&self) -> Percentage {
        Percentage::from_ratio(self.responses.len() as f64, f64::from(self.total_items))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record (or re-record) the answer to one item.
    ///
    /// The first response moves a draft assessment into `InProgress`.
    /// Re-answering an item overwrites the earlier response while the
    /// assessment is still mutable.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the assessment is completed or cancelled
    /// - `InvalidInput` if the item number is outside the scale or the
    ///   score is not finite
    pub fn add_response(
        &mut self,
        item_number: u32,
        value: Value,
        score: f64,
        response_time_ms: Option<u64>,
    ) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        if item_number < 1 || item_number > self.total_items {
            return Err(DomainError::invalid_input_for_item(
                item_number,
                format!(
                    "Item {} is outside the scale's range 1..={}",
                    item_number, self.total_items
                ),
            ));
        }

        let response = Response::new(item_number, value, score, response_time_ms)
            .map_err(DomainError::from)?;

        if self.status == AssessmentStatus::Draft {
            self.status = AssessmentStatus::InProgress;
        }

        self.responses.insert(item_number, response);
        self.last_activity_at = Timestamp::now();
        Ok(())
    }

    /// Returns true if enough items are answered to complete.
    pub fn can_complete(&self) -> bool {
        self.status.is_mutable()
            && self.completion_percentage().value() >= COMPLETION_THRESHOLD
    }

    /// Complete the assessment after a successful scoring run.
    ///
    /// Freezes responses and stamps `completed_at`. The scoring result must
    /// come from the current response set.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already terminal, below the completion
    ///   threshold, or handed a stale scoring result
    pub fn complete(&mut self, scoring: &ScoringResult) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&AssessmentStatus::Completed) {
            return Err(DomainError::invalid_state(format!(
                "Cannot complete an assessment in the {} state",
                self.status
            )));
        }
        if !self.can_complete() {
            return Err(DomainError::invalid_state(format!(
                "Completion requires at least {}% of items answered, have {}",
                COMPLETION_THRESHOLD,
                self.completion_percentage()
            )));
        }
        if scoring.completion_percentage != self.completion_percentage() {
            return Err(DomainError::invalid_state(
                "Scoring result does not match the current response set",
            ));
        }

        self.status = AssessmentStatus::Completed;
        self.completed_at = Some(Timestamp::now());
        Ok(())
    }

    /// Cancel the assessment.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already completed or cancelled
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&AssessmentStatus::Cancelled) {
            return Err(DomainError::invalid_state(format!(
                "Cannot cancel an assessment in the {} state",
                self.status
            )));
        }

        self.status = AssessmentStatus::Cancelled;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expiry
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true if idle past the default 60-minute window.
    pub fn is_expired(&self) -> bool {
        self.is_expired_after(DEFAULT_MAX_IDLE_MINUTES)
    }

    /// Returns true if non-terminal and idle longer than `max_idle_minutes`.
    ///
    /// Terminal assessments never expire.
    pub fn is_expired_after(&self, max_idle_minutes: i64) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        Timestamp::now().minutes_since(&self.last_activity_at) > max_idle_minutes
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that responses can still be recorded.
    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::invalid_state(format!(
                "Responses are frozen once an assessment is {}",
                self.status
            )))
        }
    }
}
