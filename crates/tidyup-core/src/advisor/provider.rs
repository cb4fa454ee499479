//! Advisor trait for schema and cleaning-step suggestions.
//!
//! Any backend that can turn a [`DatasetSummary`] into a
//! [`SchemaSuggestion`] implements [`SchemaAdvisor`]. Suggestions are purely
//! advisory: nothing in the cleaning engine reads them.

use super::{DatasetSummary, SchemaSuggestion};
use anyhow::Result;

/// Trait for services that suggest column types and cleaning steps.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage across threads.
///
/// # Error Handling
///
/// Implementations return errors via `anyhow::Result`;
/// [`super::advise`] turns them into a fallback payload.
pub trait SchemaAdvisor: Send + Sync {
    /// Suggest a type and cleaning recipe for every column of the summary.
    fn suggest(&self, summary: &DatasetSummary) -> Result<SchemaSuggestion>;

    /// Advisor name for logging and debugging.
    fn name(&self) -> &str;

    /// Model behind the advisor, if any.
    fn model(&self) -> Option<&str> {
        None
    }
}
