//! Mock intent parser for testing
//!
//! Returns queued intents without any real parsing, and records every
//! request for assertions. Queue empty means the default intent; a queued
//! failure simulates a collaborator outage.

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::IntentParser;
use crate::intent::ParsedIntent;

enum Reply {
    Intent(ParsedIntent),
    Failure(String),
}

#[derive(Default)]
pub struct MockParser {
    replies: Mutex<Vec<Reply>>,
    default_intent: ParsedIntent,
    requests: Mutex<Vec<String>>,
}

impl MockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that always returns the given intent
    pub fn with_intent(intent: ParsedIntent) -> Self {
        Self {
            default_intent: intent,
            ..Self::default()
        }
    }

    /// Queue an intent to return (FIFO)
    pub fn queue_intent(&self, intent: ParsedIntent) {
        self.replies
            .lock()
            .expect("mock lock")
            .push(Reply::Intent(intent));
    }

    /// Queue a simulated failure
    pub fn queue_failure(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock lock")
            .push(Reply::Failure(message.into()));
    }

    /// All request texts seen so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl IntentParser for MockParser {
    fn name(&self) -> &str {
        "mock"
    }

    async fn parse(
        &self,
        request: &str,
        _platforms: &[String],
        _context_keys: &[String],
    ) -> Result<ParsedIntent> {
        self.requests
            .lock()
            .expect("mock lock")
            .push(request.to_string());

        let mut replies = self.replies.lock().expect("mock lock");
        if replies.is_empty() {
            return Ok(self.default_intent.clone());
        }
        match replies.remove(0) {
            Reply::Intent(intent) => Ok(intent),
            Reply::Failure(message) => bail!(message),
        }
    }
}
