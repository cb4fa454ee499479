//! Pipeline module.
//!
//! The canonical-order runner and report replay.

mod builder;
mod replay;

pub use builder::{CleaningOutcome, Pipeline, PipelineBuilder};
pub use replay::replay;
