//! Keyword intent parser
//!
//! Offline fallback: platform by substring match against the known platform
//! names, action intent and entity type by a small keyword table, parameters
//! via the quoted-string extractor. Good enough for demos and tests; real
//! deployments plug in an API-backed parser.

use anyhow::Result;
use async_trait::async_trait;

use super::IntentParser;
use crate::intent::{extract_request_params, ParsedIntent};

#[derive(Debug, Default)]
pub struct KeywordParser;

impl KeywordParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentParser for KeywordParser {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn parse(
        &self,
        request: &str,
        platforms: &[String],
        _context_keys: &[String],
    ) -> Result<ParsedIntent> {
        let lower = request.to_lowercase();

        let platform = platforms
            .iter()
            .find(|p| lower.contains(&p.to_lowercase()))
            .cloned();

        let action_intent = if lower.contains("create") {
            Some("create")
        } else if lower.contains("update") {
            Some("update")
        } else if lower.contains("list") || lower.contains("get") {
            Some("list")
        } else if lower.contains("send") {
            Some("send")
        } else {
            None
        }
        .map(str::to_string);

        let entity_type = if lower.contains("collection") {
            Some("collection")
        } else if lower.contains("item") {
            Some("item")
        } else if lower.contains("post") {
            Some("post")
        } else if lower.contains("message") || lower.contains("notification") {
            Some("message")
        } else {
            None
        }
        .map(str::to_string);

        tracing::debug!(?platform, ?action_intent, ?entity_type, "keyword parse");

        Ok(ParsedIntent {
            platform,
            action_intent,
            entity_type,
            parameters: extract_request_params(request),
            context_variables: vec![],
            constraints: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platforms() -> Vec<String> {
        vec!["webflow_v2".into(), "slack".into(), "wordpress".into()]
    }

    #[tokio::test]
    async fn test_platform_and_intent_detection() {
        let parser = KeywordParser::new();
        let intent = parser
            .parse(
                "Create a new Slack message about our traffic increase",
                &platforms(),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(intent.platform.as_deref(), Some("slack"));
        assert_eq!(intent.action_intent.as_deref(), Some("create"));
        assert_eq!(intent.entity_type.as_deref(), Some("message"));
    }

    #[tokio::test]
    async fn test_unknown_platform_left_empty() {
        let parser = KeywordParser::new();
        let intent = parser
            .parse("Create a Jira ticket", &platforms(), &[])
            .await
            .unwrap();
        assert!(intent.platform.is_none());
        assert_eq!(intent.action_intent.as_deref(), Some("create"));
    }

    #[tokio::test]
    async fn test_quoted_title_extracted() {
        let parser = KeywordParser::new();
        let intent = parser
            .parse(
                r#"Create a wordpress post with the title "Best Pages of 2026""#,
                &platforms(),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(
            intent.parameters.get("title").unwrap(),
            "Best Pages of 2026"
        );
    }
}
