//! Assessment module - The mutable aggregate holding patient responses.

mod aggregate;
mod response;

pub use aggregate::{Assessment, COMPLETION_THRESHOLD, DEFAULT_MAX_IDLE_MINUTES};
pub use response::Response;
