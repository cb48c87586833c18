//! # Intent parser abstraction
//!
//! Trait and implementations for the NLU collaborator that turns raw user
//! text into a [`ParsedIntent`]. The pipeline never depends on how that
//! judgment is made, only on the shape it produces — and it must tolerate an
//! empty or partial result (no platform identified is a valid answer).
//!
//! ## Available parsers
//!
//! | Parser | Use case | Requires |
//! |--------|----------|----------|
//! | `keyword` | Offline default | Nothing |
//! | `openai` | API-backed parsing | `OPENAI_API_KEY` env var |
//! | `mock` | Testing | Nothing |

mod http;
mod keyword;
mod mock;

pub use http::HttpParser;
pub use keyword::KeywordParser;
pub use mock::MockParser;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::WeftError;
use crate::intent::ParsedIntent;

/// NLU collaborator contract
///
/// `parse` may fail or time out; the orchestrator converts that into a
/// request-level error result, never a crash.
#[async_trait]
pub trait IntentParser: Send + Sync {
    /// Parser name (e.g. "keyword", "openai", "mock")
    fn name(&self) -> &str;

    /// Parse raw user text given the known platform names and the available
    /// context variable names
    async fn parse(
        &self,
        request: &str,
        platforms: &[String],
        context_keys: &[String],
    ) -> Result<ParsedIntent>;
}

/// Create a parser instance by name
pub fn create_parser(name: &str) -> Result<Box<dyn IntentParser>, WeftError> {
    match name.to_lowercase().as_str() {
        "keyword" => Ok(Box::new(KeywordParser::new())),
        "openai" => Ok(Box::new(HttpParser::from_env()?)),
        "mock" => Ok(Box::new(MockParser::new())),
        _ => Err(WeftError::UnknownParser {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_keyword_parser() {
        let parser = create_parser("keyword").unwrap();
        assert_eq!(parser.name(), "keyword");
    }

    #[test]
    fn test_create_mock_parser() {
        let parser = create_parser("MOCK").unwrap();
        assert_eq!(parser.name(), "mock");
    }

    #[test]
    fn test_create_unknown_parser() {
        assert!(matches!(
            create_parser("clairvoyant"),
            Err(WeftError::UnknownParser { .. })
        ));
    }
}
