//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.

mod interpretation_service;

pub use interpretation_service::{Interpretation, InterpretationService};
