//! Prompt templates for grounded generation

use crate::providers::vector_store::VectorSearchResult;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render ranked results as numbered source blocks separated by blank lines
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "[Source {} - {}]\n{}",
                    i + 1,
                    result.filename,
                    result.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt: grounding rules, context, then the question verbatim
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a helpful assistant that answers questions based on the provided context.
Use ONLY the information from the context below to answer the question.
If the context doesn't contain enough information to answer, say so clearly.

Context:
{context}

Question: {question}

Answer:"#
        )
    }
}
