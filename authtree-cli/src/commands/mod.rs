//! CLI commands: analyze, validate and run, each returning a serializable report.
//!
//! Every command builds a [`CliEngine`] from the [`CliConfig`](crate::CliConfig), so
//! they can be called from the binary or programmatically (tests, scripts).

mod analyze;
mod engine;
mod run;
mod validate;

pub use analyze::{analyze, AnalyzeReport};
pub use engine::CliEngine;
pub use run::{run, RunReport, RunRequest};
pub use validate::{validate, validate_all, UnwiredOutcome, ValidateReport};
