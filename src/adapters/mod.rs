//! Adapters - In-process implementations of the ports.

pub mod interpretation;

pub use interpretation::{SeverityBand, ThresholdInterpreter};
