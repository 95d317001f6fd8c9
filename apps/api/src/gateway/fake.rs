#![allow(dead_code)]

//! A scripted fake backend for testing.
//!
//! The fake returns queued outcomes in order without making any network
//! calls, and records every prompt it receives so tests can verify what the
//! orchestrator actually sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{BackendError, BackendId, TextBackend};

pub struct FakeBackend {
    id: BackendId,
    outcomes: Mutex<VecDeque<Result<String, BackendError>>>,
    /// Prompts received, in call order. Inspect in tests.
    pub prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(name: &'static str) -> Self {
        Self {
            id: BackendId::new(name),
            outcomes: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues a successful response.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(text.into()));
        self
    }

    /// Queues a failure with the given HTTP status.
    pub fn with_status_failure(self, status: u16) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(BackendError::HttpStatus(status)));
        self
    }

    /// Queues an arbitrary typed failure.
    pub fn with_failure(self, error: BackendError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextBackend for FakeBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        // An unscripted call fails: a fake with no queued outcomes behaves
        // like a permanently unreachable backend.
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(BackendError::MalformedResponse(
                "fake backend script exhausted".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_returns_scripted_outcomes_in_order() {
        let backend = FakeBackend::new("fake")
            .with_reply("first")
            .with_status_failure(500);

        assert_eq!(backend.generate("a").await.unwrap(), "first");
        assert!(matches!(
            backend.generate("b").await.unwrap_err(),
            BackendError::HttpStatus(500)
        ));
        assert_eq!(backend.prompt_count(), 2);
    }

    #[tokio::test]
    async fn test_unscripted_fake_always_fails() {
        let backend = FakeBackend::new("fake");
        assert!(backend.generate("anything").await.is_err());
    }
}
