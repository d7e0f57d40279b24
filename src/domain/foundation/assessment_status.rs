//! AssessmentStatus enum for tracking lifecycle of assessment administrations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an assessment administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Cancelled,
}

impl AssessmentStatus {
    /// Returns true if responses can still be recorded.
    pub fn is_mutable(&self) -> bool {
        matches!(self, AssessmentStatus::Draft | AssessmentStatus::InProgress)
    }

    /// Returns true if the assessment has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AssessmentStatus::Completed | AssessmentStatus::Cancelled
        )
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Draft -> InProgress
    /// - Draft -> Cancelled
    /// - InProgress -> Completed
    /// - InProgress -> Cancelled
    pub fn can_transition_to(&self, target: &AssessmentStatus) -> bool {
        use AssessmentStatus::*;
        matches!(
            (self, target),
            (Draft, InProgress)
                | (Draft, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    /// Returns all valid target states from the current state.
    pub fn valid_transitions(&self) -> Vec<AssessmentStatus> {
        use AssessmentStatus::*;
        match self {
            Draft => vec![InProgress, Cancelled],
            InProgress => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssessmentStatus::Draft => "Draft",
            AssessmentStatus::InProgress => "InProgress",
            AssessmentStatus::Completed => "Completed",
            AssessmentStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
