//! Answer composition over retrieved chunks

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{LlmProvider, VectorSearchResult};

use super::prompt::PromptBuilder;

/// Returned when nothing was retrieved; the model is not called
pub const NO_DOCUMENTS_MESSAGE: &str =
    "No documents found to answer your question. Please upload some documents first.";

/// Returned when the model produced no text
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate an answer.";

/// Builds a grounded prompt from ranked chunks and asks the model once
#[derive(Clone)]
pub struct AnswerComposer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Compose an answer to `question` from `results` (best match first)
    pub async fn compose(&self, question: &str, results: &[VectorSearchResult]) -> Result<String> {
        if results.is_empty() {
            tracing::info!("No chunks retrieved, skipping generation");
            return Ok(NO_DOCUMENTS_MESSAGE.to_string());
        }

        let context = PromptBuilder::build_context(results);
        let prompt = PromptBuilder::build_grounded_prompt(question, &context);

        match self.llm.generate(&prompt).await? {
            Some(answer) if !answer.trim().is_empty() => Ok(answer),
            _ => {
                tracing::warn!("Model returned no text for a {}-source prompt", results.len());
                Ok(GENERATION_FAILED_MESSAGE.to_string())
            }
        }
    }
}
