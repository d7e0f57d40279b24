//! Completion analysis - coverage, gaps, premature termination.

use serde::{Deserialize, Serialize};

/// Completion rate under which the administration is inadequate.
const ADEQUATE_COMPLETION_RATE: f64 = 0.5;

/// Unanswered-tail fraction at which a sequential start counts as
/// premature termination.
const PREMATURE_TAIL_FRACTION: f64 = 0.2;

/// Largest internal gap tolerated before the gap penalty applies.
const GAP_PENALTY_THRESHOLD: u32 = 5;

const PREMATURE_PENALTY: f64 = 0.6;
const GAP_PENALTY: f64 = 0.8;

/// Coverage of the scale's items and the shape of what is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionAnalysis {
    /// True for any non-empty response set; false only in a degraded
    /// report.
    pub available: bool,
    /// Answered / total items (0.0 to 1.0).
    pub completion_rate: f64,
    pub adequate_completion: bool,
    /// Number of unanswered stretches between answered items.
    pub gap_count: usize,
    /// Size of the largest such stretch.
    pub largest_gap: u32,
    /// True when a gap-free sequential start stops well short of the end.
    pub premature_termination: bool,
    pub validity_score: f64,
}

impl CompletionAnalysis {
    /// Returns the not-computed placeholder.
    pub(super) fn unavailable() -> Self {
        Self {
            available: false,
            completion_rate: 0.0,
            adequate_completion: false,
            gap_count: 0,
            largest_gap: 0,
            premature_termination: false,
            validity_score: 1.0,
        }
    }

    /// Analyzes the ascending answered item numbers against the scale size.
    pub fn analyze(answered_items: &[u32], total_items: u32, completion_rate: f64) -> Self {
        let (gap_count, largest_gap) = Self::internal_gaps(answered_items);

        let premature_termination = match answered_items.last() {
            Some(&last) if gap_count == 0 && last < total_items => {
                let tail = f64::from(total_items - last);
                tail / f64::from(total_items) >= PREMATURE_TAIL_FRACTION
            }
            _ => false,
        };

        let mut score = completion_rate;
        if premature_termination {
            score *= PREMATURE_PENALTY;
        }
        if largest_gap > GAP_PENALTY_THRESHOLD {
            score *= GAP_PENALTY;
        }

        Self {
            available: true,
            completion_rate,
            adequate_completion: completion_rate >= ADEQUATE_COMPLETION_RATE,
            gap_count,
            largest_gap,
            premature_termination,
            validity_score: score.clamp(0.0, 1.0),
        }
    }

    /// Counts unanswered stretches strictly between answered items.
    fn internal_gaps(answered_items: &[u32]) -> (usize, u32) {
        let mut count = 0;
        let mut largest = 0;
        for window in answered_items.windows(2) {
            let gap = window[1] - window[0] - 1;
            if gap > 0 {
                count += 1;
                largest = largest.max(gap);
            }
        }
        (count, largest)
    }
}
