//! Deterministic providers for end-to-end tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use remind_rag::config::RagConfig;
use remind_rag::providers::{EmbeddingProvider, LlmProvider};
use remind_rag::retrieval::InMemoryVectorStore;
use remind_rag::{RagPipeline, Result};

pub const DIMENSIONS: usize = 16;

/// Bag-of-words embedding: each lowercase word bumps one hashed bucket
pub struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0; DIMENSIONS];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            let bucket = word
                .bytes()
                .fold(7usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize));
            v[bucket % DIMENSIONS] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Records prompts and answers with a fixed reply
#[derive(Default)]
pub struct RecordingLlm {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().push(prompt.to_string());
        Ok(Some("Grounded answer.".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

pub fn test_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.embeddings.dimensions = DIMENSIONS;
    config.embeddings.parallel_requests = Some(4);
    config
}

pub fn memory_pipeline() -> (RagPipeline, Arc<RecordingLlm>) {
    let llm = Arc::new(RecordingLlm::default());
    let pipeline = RagPipeline::from_config(
        &test_config(),
        Arc::new(HashEmbedder),
        llm.clone(),
        Arc::new(InMemoryVectorStore::new()),
    );
    (pipeline, llm)
}
