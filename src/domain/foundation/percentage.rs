//! Percentage value object (0-100 scale, fractional).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0.0 and 100.0 inclusive.
///
/// Completion percentages carry fractions (e.g. 2 of 3 subscale items
/// answered is 66.67%), so this is float-backed rather than integral.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a new Percentage, clamping to valid range.
    ///
    /// Non-finite input clamps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 100.0))
        } else {
            Self(0.0)
        }
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::out_of_range(
                "percentage",
                0.0,
                100.0,
                value,
            ));
        }
        Ok(Self(value))
    }

    /// Creates a Percentage from a numerator/denominator pair.
    ///
    /// A zero denominator yields 0%.
    pub fn from_ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Self::ZERO;
        }
        Self::new(100.0 * numerator / denominator)
    }

    /// Returns the value as f64 (0.0 to 100.0).
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}
