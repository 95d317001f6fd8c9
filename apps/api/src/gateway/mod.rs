//! Model Gateway — the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call a backend API directly.
//! All LLM interactions MUST go through a [`TextBackend`] held by the gateway.
//!
//! Each backend speaks its own request/response envelope (payload shape, auth
//! header placement, token-limit field name); the wrappers in this module
//! normalize those differences behind one call signature. A backend call makes
//! exactly one outbound request: no retries, no caching. Retry and fallback
//! policy belong to the orchestrator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;

pub mod fake;
pub mod gemini;
pub mod mistral;
pub mod openai;

use gemini::GeminiBackend;
use mistral::MistralBackend;
use openai::OpenAiBackend;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Stable identifier for a configured backend, used for attribution in
/// evaluations and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BackendId(&'static str);

impl BackendId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Typed failure for a single backend call. Backend wrappers never raise:
/// every fault becomes one of these variants.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication rejected (status {0})")]
    Auth(u16),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// One externally hosted text-generation service.
///
/// Implementations must be cheap to share (`Arc<dyn TextBackend>`) and must
/// make exactly one outbound request per `generate` call.
#[async_trait]
pub trait TextBackend: Send + Sync {
    fn id(&self) -> BackendId;

    /// Sends one prompt and returns the generated text un-modified,
    /// or a typed failure.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// The configured backend set, in invocation order.
///
/// Order matters twice: ideal-resume generation walks it as a fallback chain,
/// and evaluation results are collected in this order for stable attribution.
/// Adding a backend means adding a wrapper and one line in `from_config`;
/// orchestration code only ever iterates `backends()`.
pub struct ModelGateway {
    backends: Vec<Arc<dyn TextBackend>>,
}

impl ModelGateway {
    pub fn new(backends: Vec<Arc<dyn TextBackend>>) -> Self {
        Self { backends }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            Arc::new(GeminiBackend::new(config.gemini_api_key.clone())),
            Arc::new(OpenAiBackend::new(config.openai_api_key.clone())),
            Arc::new(MistralBackend::new(config.mistral_api_key.clone())),
        ])
    }

    pub fn backends(&self) -> &[Arc<dyn TextBackend>] {
        &self.backends
    }
}

/// Shared HTTP client construction for all backend wrappers.
pub(crate) fn build_http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Maps a non-2xx status to the matching failure kind.
pub(crate) fn status_to_error(status: StatusCode) -> BackendError {
    match status.as_u16() {
        401 | 403 => BackendError::Auth(status.as_u16()),
        code => BackendError::HttpStatus(code),
    }
}
