//! The retrieval pipeline: ingest documents and answer questions over them

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::config::RagConfig;
use crate::embeddings::Embedder;
use crate::error::{Error, Result};
use crate::generation::AnswerComposer;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStoreProvider};
use crate::types::{
    Document, DocumentSummary, IngestResult, NewChunk, QueryResult, RetrievedSource,
};

/// Chunk, embed, store, retrieve and compose
#[derive(Clone)]
pub struct RagPipeline {
    chunker: TextChunker,
    embedder: Embedder,
    store: Arc<dyn VectorStoreProvider>,
    composer: AnswerComposer,
    top_k: usize,
}

impl RagPipeline {
    /// Assemble a pipeline from already constructed parts
    pub fn new(
        chunker: TextChunker,
        embedder: Embedder,
        store: Arc<dyn VectorStoreProvider>,
        composer: AnswerComposer,
        top_k: usize,
    ) -> Self {
        Self {
            chunker,
            embedder,
            store,
            composer,
            top_k,
        }
    }

    /// Build a pipeline from configuration and injected providers
    pub fn from_config(
        config: &RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self::new(
            TextChunker::from_config(&config.chunking),
            Embedder::from_config(embedding_provider, &config.embeddings),
            store,
            AnswerComposer::new(llm_provider),
            config.retrieval.top_k,
        )
    }

    pub fn store(&self) -> &Arc<dyn VectorStoreProvider> {
        &self.store
    }

    /// Split, embed and store a document.
    ///
    /// Nothing is written unless every chunk was embedded. Whitespace-only
    /// text is still recorded, with no chunks.
    #[tracing::instrument(skip(self, text), fields(bytes = text.len()))]
    pub async fn ingest(&self, text: &str, filename: &str) -> Result<IngestResult> {
        let start = Instant::now();

        if filename.trim().is_empty() {
            return Err(Error::validation("Filename is required"));
        }

        let chunks = self.chunker.chunk(text);
        tracing::info!("[{}] Created {} chunks, generating embeddings...", filename, chunks.len());

        let embeddings = self.embedder.embed_batch(&chunks).await?;

        let new_chunks: Vec<NewChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (content, embedding))| NewChunk::new(i as u32, content, embedding))
            .collect();
        let chunk_count = new_chunks.len();

        let document = Document::new(filename, text);
        self.store.insert_document(&document, new_chunks).await?;

        tracing::info!(
            "[{}] Ingested {} chunks in {}ms",
            filename,
            chunk_count,
            start.elapsed().as_millis()
        );

        Ok(IngestResult {
            id: document.id,
            filename: document.filename,
            uploaded_at: document.uploaded_at,
            chunk_count,
        })
    }

    /// Answer a question from the stored chunks
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, question: &str) -> Result<QueryResult> {
        let start = Instant::now();

        if question.trim().is_empty() {
            return Err(Error::validation("Question is required"));
        }

        let query_embedding = self.embedder.embed_one(question).await?;
        let results = self.store.top_k(&query_embedding, self.top_k).await?;
        tracing::debug!("Retrieved {} chunks", results.len());

        let answer = self.composer.compose(question, &results).await?;

        let sources = results
            .iter()
            .enumerate()
            .map(|(i, result)| RetrievedSource::from_result(result, i + 1))
            .collect::<Vec<_>>();

        tracing::info!(
            "Query completed in {}ms, {} sources",
            start.elapsed().as_millis(),
            sources.len()
        );

        Ok(QueryResult { answer, sources })
    }

    /// All documents, newest first
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        self.store.list_documents().await
    }

    /// Delete a document and its chunks; `false` if it did not exist
    pub async fn delete_document(&self, id: &Uuid) -> Result<bool> {
        let deleted = self.store.delete_document(id).await?;
        if deleted {
            tracing::info!("Deleted document {}", id);
        }
        Ok(deleted)
    }
}
