//! Interpretation adapters.

mod threshold_interpreter;

pub use threshold_interpreter::{SeverityBand, ThresholdInterpreter};
