//! Batch embedding over an injected provider

use futures_util::future::join_all;
use std::sync::Arc;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

use super::normalize::l2_normalize_in_place;

/// Turns text into unit-length vectors of a fixed dimension
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    dimensions: usize,
    parallel_requests: usize,
}

impl Embedder {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        dimensions: usize,
        parallel_requests: usize,
    ) -> Self {
        Self {
            provider,
            dimensions,
            parallel_requests: parallel_requests.max(1),
        }
    }

    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        Self::new(provider, config.dimensions, config.parallelism())
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed a single text
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let raw = self.provider.embed(text).await?;
        self.finish(raw)
    }

    /// Embed many texts; output order matches input order.
    ///
    /// Requests are issued `parallel_requests` at a time. Any failure fails
    /// the whole batch.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        let total_batches = texts.len().div_ceil(self.parallel_requests);

        for (batch_idx, batch) in texts.chunks(self.parallel_requests).enumerate() {
            let futures: Vec<_> = batch.iter().map(|text| self.embed_one(text)).collect();

            for result in join_all(futures).await {
                embeddings.push(result?);
            }

            tracing::debug!(
                "Embedding batch {}/{} done ({} texts)",
                batch_idx + 1,
                total_batches,
                batch.len()
            );
        }

        Ok(embeddings)
    }

    fn finish(&self, mut vector: Vec<f32>) -> Result<Vec<f32>> {
        if vector.len() != self.dimensions {
            return Err(Error::provider(format!(
                "Embedding has {} dimensions, expected {}",
                vector.len(),
                self.dimensions
            )));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(Error::provider("Embedding contains non-finite values"));
        }
        l2_normalize_in_place(&mut vector);
        Ok(vector)
    }
}
