//! Provider abstractions for embeddings, generation and the retrieval index
//!
//! Each capability is a trait constructed once at startup and injected into
//! the pipeline, so the remote backend (Gemini or Ollama) and the index
//! (SQLite or memory) can be swapped without touching the pipeline.

pub mod embedding;
pub mod gemini;
pub mod llm;
pub mod ollama;
pub mod vector_store;

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use ollama::OllamaClient;
pub use vector_store::{VectorSearchResult, VectorStoreProvider};

/// Outcome of a failed provider request
#[derive(Debug)]
pub(crate) enum RequestError {
    /// Transport failure, timeout, 429 or 5xx: worth another attempt
    Retryable(Error),
    /// Any other failure is returned to the caller immediately
    Permanent(Error),
}

impl RequestError {
    /// Classify a non-success HTTP status
    pub(crate) fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            Self::Retryable(Error::provider(message))
        } else {
            Self::Permanent(Error::provider(message))
        }
    }
}

/// Retry an operation with exponential backoff (1s, 2s, 4s, ...)
///
/// Only `RequestError::Retryable` failures are retried.
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, RequestError>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(RequestError::Permanent(e)) => return Err(e),
            Err(RequestError::Retryable(e)) => {
                last_error = Some(e);
                if attempt < max_retries {
                    let delay = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "Request failed (attempt {}/{}), retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::provider("Unknown error")))
}

/// Build the shared HTTP client for remote providers
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))
}
