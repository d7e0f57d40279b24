//! Response value object - one answered item.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;

/// A patient's answer to a single item.
///
/// The raw `value` is whatever the instrument collected (a Likert label, a
/// multiple-choice key, free text) and is opaque to scoring; `score` is the
/// numeric contribution the scale's key assigns to that answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub item_number: u32,
    pub value: Value,
    pub score: f64,
    pub response_time_ms: Option<u64>,
}

impl Response {
    /// Creates a response.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if `item_number` is zero
    /// - `InvalidFormat` if `score` is not finite
    pub fn new(
        item_number: u32,
        value: Value,
        score: f64,
        response_time_ms: Option<u64>,
    ) -> Result<Self, ValidationError> {
        if item_number == 0 {
            return Err(ValidationError::invalid_format(
                "item_number",
                "item numbers start at 1",
            ));
        }
        if !score.is_finite() {
            return Err(ValidationError::invalid_format(
                "score",
                "score must be a finite number",
            ));
        }
        Ok(Self {
            item_number,
            value,
            score,
            response_time_ms,
        })
    }

    /// Creates a response with a plain numeric answer and no timing.
    pub fn scored(item_number: u32, score: f64) -> Result<Self, ValidationError> {
        Self::new(item_number, Value::from(score), score, None)
    }

    /// Returns true if this response carries timing information.
    pub fn is_timed(&self) -> bool {
        self.response_time_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_accepts_valid_response() {
        let response = Response::new(3, json!("several days"), 1.0, Some(2400)).unwrap();
        assert_eq!(response.item_number, 3);
        assert_eq!(response.score, 1.0);
        assert!(response.is_timed());
    }

    #[test]
    fn new_rejects_item_number_zero() {
        assert!(Response::new(0, json!(2), 2.0, None).is_err());
    }

    #[test]
    fn new_rejects_nan_score() {
        assert!(Response::new(1, json!(null), f64::NAN, None).is_err());
        assert!(Response::new(1, json!(null), f64::INFINITY, None).is_err());
    }

    #[test]
    fn scored_builds_numeric_answer() {
        let response = Response::scored(5, 2.0).unwrap();
        assert_eq!(response.value, json!(2.0));
        assert!(!response.is_timed());
    }

    #[test]
    fn categorical_value_with_numeric_score_roundtrips() {
        let response = Response::new(2, json!("agree"), 4.0, None).unwrap();
        let json = serde_json::to_string(&response).unwrap();
        let back: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(back, response);
    }
}
