//! Scale definitions - the immutable scoring rules of an instrument.
//!
//! Definitions are supplied by an external catalog and arrive pre-validated;
//! `validate` re-checks the structural invariants the scoring engine relies
//! on so a malformed definition surfaces as `InvalidInput` rather than a
//! wrong score.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::{DomainError, ErrorCode, ScaleId, ValidationError};

/// Defines the valid range for a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Creates a score range, returning error unless min < max.
    pub fn new(min: f64, max: f64) -> Result<Self, ValidationError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ValidationError::invalid_format(
                "score_range",
                format!("min ({}) must be less than max ({})", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    /// Returns true if the value lies within the range, inclusive.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// The sum a raw value and its reverse-keyed counterpart add up to.
    pub fn reversal_sum(&self) -> f64 {
        self.min + self.max
    }
}

/// How raw item scores combine into the scale's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Total is the plain sum of item scores.
    Sum,
    /// Total is the mean of answered item scores.
    Average,
    /// Total is the weighted sum using per-item weights.
    Weighted,
}

/// A named subset of a scale's items scored independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscaleDefinition {
    pub id: String,
    pub name: String,
    pub items: BTreeSet<u32>,
    pub score_range: ScoreRange,
}

impl SubscaleDefinition {
    /// Creates a subscale definition.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        items: impl IntoIterator<Item = u32>,
        score_range: ScoreRange,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: items.into_iter().collect(),
            score_range,
        }
    }
}

/// Expected relationship between the two items of a consistency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPolarity {
    /// Both items ask the same thing; scores should agree.
    Direct,
    /// The second item is reverse-keyed; scores should mirror each other
    /// across the item range.
    Reversed,
}

/// A pair of items used to probe response consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyPair {
    pub first_item: u32,
    pub second_item: u32,
    pub polarity: PairPolarity,
}

impl ConsistencyPair {
    /// Creates a direct (same-keyed) pair.
    pub fn direct(first_item: u32, second_item: u32) -> Self {
        Self {
            first_item,
            second_item,
            polarity: PairPolarity::Direct,
        }
    }

    /// Creates a reversed (reverse-keyed) pair.
    pub fn reversed(first_item: u32, second_item: u32) -> Self {
        Self {
            first_item,
            second_item,
            polarity: PairPolarity::Reversed,
        }
    }
}

/// A standardized questionnaire definition: items, scoring rules, subscales.
///
/// # Invariants
///
/// - `total_items` > 0
/// - every subscale's item set ⊆ `[1, total_items]`
/// - `scoring_method == Weighted` requires `item_weights`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleDefinition {
    pub id: ScaleId,
    pub name: String,
    pub total_items: u32,
    pub score_range: ScoreRange,
    pub scoring_method: ScoringMethod,
    /// Per-item weights for `Weighted` scoring. Items without an entry
    /// weigh 1.0.
    pub item_weights: Option<BTreeMap<u32, f64>>,
    /// Raw per-item score range, required to evaluate reverse-keyed
    /// consistency pairs.
    pub item_range: Option<ScoreRange>,
    pub subscales: Vec<SubscaleDefinition>,
    pub consistency_pairs: Vec<ConsistencyPair>,
}

impl ScaleDefinition {
    /// Creates a builder for a scale definition.
    pub fn builder(
        id: ScaleId,
        name: impl Into<String>,
        total_items: u32,
        score_range: ScoreRange,
        scoring_method: ScoringMethod,
    ) -> ScaleDefinitionBuilder {
        ScaleDefinitionBuilder {
            definition: Self {
                id,
                name: name.into(),
                total_items,
                score_range,
                scoring_method,
                item_weights: None,
                item_range: None,
                subscales: Vec::new(),
                consistency_pairs: Vec::new(),
            },
        }
    }

    /// Returns true if the item number belongs to this scale.
    pub fn contains_item(&self, item_number: u32) -> bool {
        item_number >= 1 && item_number <= self.total_items
    }

    /// Weight applied to an item under `Weighted` scoring.
    ///
    /// Items without an explicit entry weigh 1.0.
    pub fn item_weight(&self, item_number: u32) -> f64 {
        self.item_weights
            .as_ref()
            .and_then(|weights| weights.get(&item_number))
            .copied()
            .unwrap_or(1.0)
    }

    /// Re-checks the structural invariants scoring relies on.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `total_items` is zero, a subscale references an
    ///   item outside `[1, total_items]`, a consistency pair references an
    ///   out-of-range item, or `Weighted` scoring has no weighting table.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.total_items == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "Scale definition must have at least one item",
            )
            .with_detail("scale_id", self.id.as_str()));
        }

        for subscale in &self.subscales {
            if let Some(item) = subscale.items.iter().find(|i| !self.contains_item(**i)) {
                return Err(DomainError::new(
                    ErrorCode::InvalidInput,
                    format!(
                        "Subscale '{}' references item {} outside 1..={}",
                        subscale.id, item, self.total_items
                    ),
                )
                .with_detail("subscale_id", subscale.id.clone())
                .with_detail("item_number", item.to_string()));
            }
        }

        for pair in &self.consistency_pairs {
            for item in [pair.first_item, pair.second_item] {
                if !self.contains_item(item) {
                    return Err(DomainError::new(
                        ErrorCode::InvalidInput,
                        format!(
                            "Consistency pair references item {} outside 1..={}",
                            item, self.total_items
                        ),
                    )
                    .with_detail("item_number", item.to_string()));
                }
            }
        }

        if self.scoring_method == ScoringMethod::Weighted && self.item_weights.is_none() {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "Weighted scoring requires a weighting function; none is defined",
            )
            .with_detail("scale_id", self.id.as_str()));
        }

        Ok(())
    }
}

/// Builder for constructing ScaleDefinition instances.
#[derive(Debug)]
pub struct ScaleDefinitionBuilder {
    definition: ScaleDefinition,
}

impl ScaleDefinitionBuilder {
    /// Adds a subscale.
    pub fn subscale(mut self, subscale: SubscaleDefinition) -> Self {
        self.definition.subscales.push(subscale);
        self
    }

    /// Sets the per-item weighting table.
    pub fn item_weights(mut self, weights: BTreeMap<u32, f64>) -> Self {
        self.definition.item_weights = Some(weights);
        self
    }

    /// Sets the raw per-item score range.
    pub fn item_range(mut self, range: ScoreRange) -> Self {
        self.definition.item_range = Some(range);
        self
    }

    /// Adds a consistency pair.
    pub fn consistency_pair(mut self, pair: ConsistencyPair) -> Self {
        self.definition.consistency_pairs.push(pair);
        self
    }

    /// Builds the definition, validating its invariants.
    pub fn build(self) -> Result<ScaleDefinition, DomainError> {
        self.definition.validate()?;
        Ok(self.definition)
    }
}
