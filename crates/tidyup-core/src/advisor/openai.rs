//! OpenAI-compatible chat-completions advisor.
//!
//! Works against the OpenAI API or any server exposing the same
//! `/chat/completions` contract (set a custom base URL).

use super::{DatasetSummary, SchemaAdvisor, SchemaSuggestion, extract_json_object};
use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for schema suggestions.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for API requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default temperature (low for stable outputs).
const DEFAULT_TEMPERATURE: f32 = 0.2;

const SYSTEM_PROMPT: &str = "Be concise and return strict JSON.";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Configuration for the OpenAI advisor.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Default)]
pub struct OpenAiConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OpenAiConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom endpoint (proxies, self-hosted compatible servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Advisor backed by an OpenAI-compatible chat model.
///
/// # Example
///
/// ```rust,ignore
/// use tidyup_core::advisor::{OpenAiAdvisor, OpenAiConfig, SchemaAdvisor};
///
/// let config = OpenAiConfig::builder().model("gpt-4o").timeout_secs(10).build();
/// let advisor = OpenAiAdvisor::with_config(api_key, config)?;
/// let suggestion = advisor.suggest(&summary)?;
/// ```
pub struct OpenAiAdvisor {
    api_key: String,
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiAdvisor {
    /// Create an advisor with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    fn build_prompt(summary: &DatasetSummary) -> Result<String> {
        Ok(format!(
            "You are a data preprocessing assistant. Given this dataset summary, \
            recommend types and cleaning steps for each column. Use json with keys: \
            {{columns: {{col: {{type, impute, encode, scale}}}}, global: {{notes}}}}.\n\n\
            DATA SUMMARY:\n{}",
            serde_json::to_string(summary)?
        ))
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("OpenAI API Error {}: {}", status, response.text()?));
        }

        let result: ChatResponse = response.json()?;
        extract_content(result)
    }
}

fn extract_content(response: ChatResponse) -> Result<String> {
    response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .map(|msg| msg.content)
        .ok_or_else(|| anyhow!("No response content from OpenAI API"))
}

/// Parse model output into a suggestion, tolerating prose around the JSON.
fn parse_suggestion(content: &str) -> Result<SchemaSuggestion> {
    let json = extract_json_object(content);
    serde_json::from_str(json).map_err(|e| anyhow!("Model returned invalid JSON: {}", e))
}

impl SchemaAdvisor for OpenAiAdvisor {
    fn suggest(&self, summary: &DatasetSummary) -> Result<SchemaSuggestion> {
        let prompt = Self::build_prompt(summary)?;
        let content = self.call_api(&prompt)?;
        debug!("Advisor returned {} bytes", content.len());
        parse_suggestion(&content)
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // ChatResponse parsing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_extract_content_from_valid_response() {
        let json = r#"{
            "choices": [{
                "message": {"role": "assistant", "content": "{\"columns\": {}}"}
            }]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_content(response).unwrap(), "{\"columns\": {}}");
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_content(response).is_err());

        let response: ChatResponse = serde_json::from_str(r#"{"choices": null}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_parse_malformed_message() {
        let json = r#"{"choices": [{"message": "not an object"}]}"#;
        let result: std::result::Result<ChatResponse, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // -------------------------------------------------------------------------
    // Suggestion parsing tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_suggestion_with_surrounding_prose() {
        let content = "Sure! Here you go:\n```json\n{\"columns\": {\"age\": {\"type\": \"numeric\"}}, \"global\": {\"notes\": \"ok\"}}\n```";
        let suggestion = parse_suggestion(content).unwrap();
        assert_eq!(suggestion.columns["age"].kind.as_deref(), Some("numeric"));
    }

    #[test]
    fn test_parse_suggestion_without_json() {
        let suggestion = parse_suggestion("I cannot help with that").unwrap();
        assert!(suggestion.columns.is_empty());
    }

    #[test]
    fn test_parse_suggestion_broken_json() {
        assert!(parse_suggestion("{\"columns\": {\"age\": }").is_err());
    }

    // -------------------------------------------------------------------------
    // Configuration tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiConfig::builder()
            .model("gpt-4o")
            .timeout_secs(5)
            .base_url("http://localhost:8080/v1/chat/completions")
            .build();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert!(config.base_url.starts_with("http://localhost"));
    }

    #[test]
    fn test_advisor_metadata() {
        let advisor = OpenAiAdvisor::new("test-key").unwrap();
        assert_eq!(advisor.name(), "OpenAI");
        assert_eq!(advisor.model(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_prompt_embeds_summary() {
        let summary = DatasetSummary {
            shape: [2, 1],
            columns: vec!["age".to_string()],
            dtypes: [("age".to_string(), "i64".to_string())].into(),
            null_counts: [("age".to_string(), 0)].into(),
            sample_rows: vec![],
        };
        let prompt = OpenAiAdvisor::build_prompt(&summary).unwrap();
        assert!(prompt.contains("DATA SUMMARY:"));
        assert!(prompt.contains("\"shape\":[2,1]"));
        assert!(prompt.contains("{columns: {col: {type, impute, encode, scale}}, global: {notes}}"));
    }
}
