//! LLM provider trait for generating answers

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text generation
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash-lite)
/// - `OllamaClient`: Local Ollama server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a fully built prompt.
    ///
    /// `Ok(None)` means the model answered without any text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
