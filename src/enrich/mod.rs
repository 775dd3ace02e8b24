//! Batch enrichment of links that lack a description.
//!
//! The pipeline walks the records missing a description one at a time,
//! asks the [`DescriptionGenerator`](crate::ports::DescriptionGenerator) for
//! each, and commits the whole collection after every success. Individual
//! failures are recorded and skipped; a stop request is honoured between
//! items.

pub mod pipeline;
pub mod progress;
pub mod prompt;

pub use pipeline::{
    CancelHandle, EnrichmentPipeline, EnrichmentRun, FailureRecord, PipelineError, RunOutcome,
    RunReport,
};
pub use progress::Progress;
