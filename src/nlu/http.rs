//! API-backed intent parser
//!
//! Sends the request text plus the known platform and context variable names
//! to an OpenAI-compatible chat-completions endpoint and expects a single
//! JSON object back. Requires `OPENAI_API_KEY`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::IntentParser;
use crate::error::WeftError;
use crate::intent::ParsedIntent;

/// Default chat-completions endpoint
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Request timeout; a hung collaborator must become a request-level error
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You convert integration requests into structured intent. \
Reply with a single JSON object with keys: platform (string or null), \
action_intent (string or null), entity_type (string or null), \
parameters (object of extracted parameter values), \
context_variables (array of referenced context variable names), \
constraints (array of strings). No prose, no code fences.";

pub struct HttpParser {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl HttpParser {
    /// Create a parser reading `OPENAI_API_KEY` from the environment
    pub fn from_env() -> Result<Self, WeftError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| WeftError::Parser {
            name: "openai".to_string(),
            details: "OPENAI_API_KEY environment variable not set".to_string(),
        })?;
        Ok(Self::with_api_key(api_key))
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a compatible endpoint; only http/https schemes are accepted
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, WeftError> {
        let endpoint = endpoint.into();
        let parsed = url::Url::parse(&endpoint).map_err(|e| WeftError::ParserEndpoint {
            endpoint: endpoint.clone(),
            details: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WeftError::ParserEndpoint {
                endpoint,
                details: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        self.endpoint = endpoint;
        Ok(self)
    }

    fn build_prompt(request: &str, platforms: &[String], context_keys: &[String]) -> String {
        format!(
            "REQUEST: {request}\n\nAVAILABLE INTEGRATIONS: {}\nAVAILABLE CONTEXT VARIABLES: {}",
            platforms.join(", "),
            context_keys.join(", ")
        )
    }
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Strip optional markdown code fences around a JSON reply
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim_end_matches('`').trim()
}

#[async_trait]
impl IntentParser for HttpParser {
    fn name(&self) -> &str {
        "openai"
    }

    async fn parse(
        &self,
        request: &str,
        platforms: &[String],
        context_keys: &[String],
    ) -> Result<ParsedIntent> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_prompt(request, platforms, context_keys),
                },
            ],
            temperature: 0.0,
        };

        tracing::debug!(model = %payload.model, endpoint = %self.endpoint, "intent parse request");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .context("intent parser request failed")?
            .error_for_status()
            .context("intent parser returned an error status")?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .context("intent parser returned a non-JSON body")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .context("intent parser returned no choices")?;

        let intent: ParsedIntent = serde_json::from_str(strip_fences(content))
            .context("intent parser reply was not a valid intent object")?;
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_scheme_validation() {
        let parser = HttpParser::with_api_key("k");
        assert!(parser.with_endpoint("ftp://example.com").is_err());
        let parser = HttpParser::with_api_key("k");
        assert!(parser.with_endpoint("https://example.com/v1").is_ok());
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_prompt_includes_platforms_and_context() {
        let prompt = HttpParser::build_prompt(
            "Create a Webflow item",
            &["webflow_v2".into(), "slack".into()],
            &["step_1.output.keyword".into()],
        );
        assert!(prompt.contains("webflow_v2, slack"));
        assert!(prompt.contains("step_1.output.keyword"));
    }

    #[test]
    fn test_partial_intent_reply_parses() {
        // The pipeline must handle an empty/partial result
        let intent: ParsedIntent = serde_json::from_str(r#"{"platform": null}"#).unwrap();
        assert!(intent.platform.is_none());
        assert!(intent.parameters.is_empty());
    }
}
