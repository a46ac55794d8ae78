//! Comparison orchestrator — extraction, scoring and reporting for one check.
//!
//! `Orchestrator::run_check` takes a target document and its population and
//! returns a `ComparisonResult`; storing it is the caller's business.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
pub use types::*;
