//! Optional schema advisor.
//!
//! An advisor looks at a [`DatasetSummary`] and suggests a type and a
//! cleaning recipe for each column. The output is shown to the user and never
//! applied automatically.
//!
//! # Feature Flag
//!
//! The [`OpenAiAdvisor`] requires the `ai` feature (enabled by default). The
//! [`SchemaAdvisor`] trait and the offline [`HeuristicAdvisor`] are always
//! available.
//!
//! ```toml
//! # Without HTTP support
//! tidyup-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tidyup_core::advisor::{advise, advisor_from_env, DatasetSummary};
//!
//! let summary = DatasetSummary::from_frame(&df)?;
//! let advice = advise(&summary, advisor_from_env().as_ref());
//! println!("{}", serde_json::to_string_pretty(&advice)?);
//! ```

mod heuristic;
mod provider;
mod suggestion;
mod summary;

#[cfg(feature = "ai")]
mod openai;

pub use heuristic::{HEURISTIC_NOTE, HeuristicAdvisor};
pub use provider::SchemaAdvisor;
pub use suggestion::{Advice, ColumnAdvice, GlobalAdvice, SchemaSuggestion};
pub use summary::{DatasetSummary, SAMPLE_ROWS};

#[cfg(feature = "ai")]
pub use openai::{OpenAiAdvisor, OpenAiConfig, OpenAiConfigBuilder};

use tracing::{info, warn};

/// Environment variable holding the API key for the model-backed advisor.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Optional override of the chat model.
pub const MODEL_ENV: &str = "OPENAI_MODEL";

/// Optional override of the chat-completions endpoint.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Slice of `text` from the first `{` to the last `}` inclusive, or `"{}"`
/// when there is no such span.
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &text[start..=end],
        _ => "{}",
    }
}

/// Ask `advisor` for a suggestion; any failure becomes [`Advice::Fallback`].
pub fn advise(summary: &DatasetSummary, advisor: &dyn SchemaAdvisor) -> Advice {
    info!(
        "Requesting schema advice from {} ({})",
        advisor.name(),
        advisor.model().unwrap_or("no model")
    );
    match advisor.suggest(summary) {
        Ok(suggestion) => Advice::Suggestion(suggestion),
        Err(e) => {
            warn!("Advisor {} failed: {:#}", advisor.name(), e);
            Advice::fallback(e.to_string())
        }
    }
}

/// Model-backed advisor when an API key is configured, heuristic otherwise.
pub fn advisor_from_env() -> Box<dyn SchemaAdvisor> {
    #[cfg(feature = "ai")]
    if let Some(advisor) = openai_from_env() {
        return advisor;
    }

    Box::new(HeuristicAdvisor::new())
}

#[cfg(feature = "ai")]
fn openai_from_env() -> Option<Box<dyn SchemaAdvisor>> {
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())?;

    let mut builder = OpenAiConfig::builder();
    if let Ok(model) = std::env::var(MODEL_ENV) {
        builder = builder.model(model);
    }
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        builder = builder.base_url(base_url);
    }

    match OpenAiAdvisor::with_config(api_key, builder.build()) {
        Ok(advisor) => Some(Box::new(advisor)),
        Err(e) => {
            warn!("Could not create OpenAI advisor, using heuristics: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use polars::prelude::*;

    struct FailingAdvisor;

    impl SchemaAdvisor for FailingAdvisor {
        fn suggest(&self, _summary: &DatasetSummary) -> anyhow::Result<SchemaSuggestion> {
            Err(anyhow!("connection refused"))
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    fn summary() -> DatasetSummary {
        let df = df!["age" => [1i64, 2], "city" => ["a", "b"]].unwrap();
        DatasetSummary::from_frame(&df).unwrap()
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("noise {\"a\": 1} tail"), "{\"a\": 1}");
        assert_eq!(
            extract_json_object("{\"a\": {\"b\": 2}}"),
            "{\"a\": {\"b\": 2}}"
        );
        assert_eq!(extract_json_object("no braces here"), "{}");
        assert_eq!(extract_json_object("} backwards {"), "{}");
        assert_eq!(extract_json_object(""), "{}");
    }

    #[test]
    fn test_advise_wraps_suggestion() {
        let advice = advise(&summary(), &HeuristicAdvisor);
        let suggestion = advice.suggestion().unwrap();
        assert_eq!(suggestion.columns.len(), 2);
    }

    #[test]
    fn test_advise_converts_failure_to_fallback() {
        let advice = advise(&summary(), &FailingAdvisor);
        match advice {
            Advice::Fallback { error, fallback } => {
                assert!(fallback);
                assert!(error.contains("connection refused"));
            }
            Advice::Suggestion(_) => panic!("expected fallback"),
        }
    }
}
