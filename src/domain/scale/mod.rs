//! Scale module - Externally-supplied questionnaire definitions.

mod definition;

pub use definition::{
    ConsistencyPair, PairPolarity, ScaleDefinition, ScaleDefinitionBuilder, ScoreRange,
    ScoringMethod, SubscaleDefinition,
};
