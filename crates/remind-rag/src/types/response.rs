//! Response types returned by the pipeline and the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::providers::vector_store::VectorSearchResult;

/// A retrieved passage, as shown to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedSource {
    /// Chunk ID
    pub id: i64,
    pub document_id: Uuid,
    pub filename: String,
    pub content: String,
    pub chunk_index: u32,
    /// Cosine similarity in [-1, 1]
    pub similarity: f32,
    /// 1-based position in the ranking
    pub rank: usize,
}

impl RetrievedSource {
    /// Build from a ranked search result
    pub fn from_result(result: &VectorSearchResult, rank: usize) -> Self {
        Self {
            id: result.chunk.id,
            document_id: result.chunk.document_id,
            filename: result.filename.clone(),
            content: result.chunk.content.clone(),
            chunk_index: result.chunk.chunk_index,
            similarity: result.similarity,
            rank,
        }
    }
}

/// Answer plus the sources it was grounded on, best match first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub answer: String,
    pub sources: Vec<RetrievedSource>,
}

/// Outcome of ingesting one document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestResult {
    pub id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub chunk_count: usize,
}

/// Body of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub deleted: bool,
}
