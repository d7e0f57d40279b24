//! Consistency analysis - agreement between paired probe items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::assessment::Response;
use crate::domain::scale::{PairPolarity, ScaleDefinition};

/// Absolute score difference within which a pair counts as agreeing.
const AGREEMENT_TOLERANCE: f64 = 1.0;

/// Agreement between the scale's paired or reverse-keyed items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyAnalysis {
    /// False when the scale defines no evaluable pairs.
    pub available: bool,
    /// Pairs with both items answered (reversed pairs also need an item
    /// range on the scale).
    pub pairs_evaluated: usize,
    pub pairs_agreeing: usize,
    /// Agreeing / evaluated (0.0 to 1.0).
    pub agreement_rate: f64,
    pub validity_score: f64,
}

impl ConsistencyAnalysis {
    /// Returns the not-computed placeholder.
    pub(super) fn unavailable() -> Self {
        Self {
            available: false,
            pairs_evaluated: 0,
            pairs_agreeing: 0,
            agreement_rate: 0.0,
            validity_score: 1.0,
        }
    }

    /// Evaluates every consistency pair with both items answered.
    pub fn analyze(scale: &ScaleDefinition, responses: &BTreeMap<u32, Response>) -> Self {
        let mut evaluated = 0;
        let mut agreeing = 0;

        for pair in &scale.consistency_pairs {
            let (Some(first), Some(second)) = (
                responses.get(&pair.first_item),
                responses.get(&pair.second_item),
            ) else {
                continue;
            };

            let agrees = match pair.polarity {
                PairPolarity::Direct => {
                    (first.score - second.score).abs() <= AGREEMENT_TOLERANCE
                }
                PairPolarity::Reversed => {
                    // Without the item range the reversal cannot be undone.
                    let Some(item_range) = scale.item_range else {
                        continue;
                    };
                    let unreversed = item_range.reversal_sum() - second.score;
                    (first.score - unreversed).abs() <= AGREEMENT_TOLERANCE
                }
            };

            evaluated += 1;
            if agrees {
                agreeing += 1;
            }
        }

        if evaluated == 0 {
            return Self::unavailable();
        }

        let agreement_rate = agreeing as f64 / evaluated as f64;
        Self {
            available: true,
            pairs_evaluated: evaluated,
            pairs_agreeing: agreeing,
            agreement_rate,
            validity_score: agreement_rate,
        }
    }
}
