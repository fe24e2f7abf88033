//! Vector store provider trait for storing documents and searching embeddings

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{Chunk, Document, DocumentSummary, NewChunk};

/// Search result from vector store
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Filename of the parent document
    pub filename: String,
    /// Cosine similarity in [-1, 1], higher is more similar
    pub similarity: f32,
}

/// Trait for the retrieval index
///
/// Implementations:
/// - `SqliteVectorStore`: SQLite file, survives restarts
/// - `InMemoryVectorStore`: process memory
///
/// Both rank by exact cosine similarity over every stored vector.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Store a document with its embedded chunks in one atomic step.
    ///
    /// Returns the assigned chunk IDs in input order.
    async fn insert_document(&self, document: &Document, chunks: Vec<NewChunk>)
        -> Result<Vec<i64>>;

    /// The `top_k` chunks most similar to the query, best first.
    ///
    /// Equal similarities keep insertion order (lower chunk ID first).
    async fn top_k(&self, query_embedding: &[f32], top_k: usize)
        -> Result<Vec<VectorSearchResult>>;

    /// All documents with their chunk counts, newest first
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>>;

    /// Fetch one document
    async fn get_document(&self, id: &Uuid) -> Result<Option<Document>>;

    /// Delete a document and all its chunks; `false` when it did not exist
    async fn delete_document(&self, id: &Uuid) -> Result<bool>;

    /// Get total number of chunks stored
    async fn len(&self) -> Result<usize>;

    /// Check if store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the store is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
