//! Parsed intent model and request parameter extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured representation of a user request, produced by an
/// [`crate::nlu::IntentParser`] and consumed read-only by the selector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedIntent {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub action_intent: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Parameter values already extracted from the request text
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub context_variables: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("valid regex"));

/// Pull parameter values out of the raw request text.
///
/// Lightweight by design: the first quoted string literal is bound to
/// `title` and/or `name` when those words appear in the request. Anything
/// smarter belongs in the NLU collaborator.
pub fn extract_request_params(request: &str) -> Map<String, Value> {
    let mut params = Map::new();

    let quoted: Vec<&str> = QUOTED
        .captures_iter(request)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if quoted.is_empty() {
        return params;
    }

    let lower = request.to_lowercase();
    if lower.contains("title") {
        params.insert("title".to_string(), Value::String(quoted[0].to_string()));
    }
    if lower.contains("name") {
        params.insert("name".to_string(), Value::String(quoted[0].to_string()));
    }

    params
}
