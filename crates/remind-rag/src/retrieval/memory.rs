//! In-memory retrieval index

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::vector_store::{VectorSearchResult, VectorStoreProvider};
use crate::types::{Chunk, Document, DocumentSummary, NewChunk};

use super::search::{cosine_similarity, select_top_k};

struct StoredChunk {
    chunk: Chunk,
    embedding: Vec<f32>,
}

#[derive(Default)]
struct ChunkTable {
    rows: Vec<StoredChunk>,
    next_id: i64,
}

/// Index held in process memory; contents are lost on restart
#[derive(Default)]
pub struct InMemoryVectorStore {
    documents: DashMap<Uuid, Document>,
    chunks: RwLock<ChunkTable>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn insert_document(
        &self,
        document: &Document,
        chunks: Vec<NewChunk>,
    ) -> Result<Vec<i64>> {
        // Held for the whole insert so readers never see a partial document
        let mut table = self.chunks.write();

        if self.documents.contains_key(&document.id) {
            return Err(Error::store(format!("Document {} already exists", document.id)));
        }

        let mut ids = Vec::with_capacity(chunks.len());
        for new_chunk in chunks {
            table.next_id += 1;
            let id = table.next_id;
            table.rows.push(StoredChunk {
                chunk: Chunk {
                    id,
                    document_id: document.id,
                    chunk_index: new_chunk.chunk_index,
                    content: new_chunk.content,
                },
                embedding: new_chunk.embedding,
            });
            ids.push(id);
        }
        self.documents.insert(document.id, document.clone());

        Ok(ids)
    }

    async fn top_k(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let table = self.chunks.read();

        let mut scored = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            if row.embedding.len() != query_embedding.len() {
                return Err(Error::store(format!(
                    "Query has {} dimensions but chunk {} has {}",
                    query_embedding.len(),
                    row.chunk.id,
                    row.embedding.len()
                )));
            }
            let similarity = cosine_similarity(query_embedding, &row.embedding);
            scored.push((row, row.chunk.id, similarity));
        }

        Ok(select_top_k(scored, top_k)
            .into_iter()
            .map(|(row, similarity)| VectorSearchResult {
                chunk: row.chunk.clone(),
                filename: self
                    .documents
                    .get(&row.chunk.document_id)
                    .map(|doc| doc.filename.clone())
                    .unwrap_or_default(),
                similarity,
            })
            .collect())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let table = self.chunks.read();

        let mut summaries: Vec<DocumentSummary> = self
            .documents
            .iter()
            .map(|doc| {
                let count = table
                    .rows
                    .iter()
                    .filter(|row| row.chunk.document_id == doc.id)
                    .count();
                DocumentSummary::from_document(doc.value(), count)
            })
            .collect();
        summaries.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        Ok(summaries)
    }

    async fn get_document(&self, id: &Uuid) -> Result<Option<Document>> {
        Ok(self.documents.get(id).map(|doc| doc.value().clone()))
    }

    async fn delete_document(&self, id: &Uuid) -> Result<bool> {
        let mut table = self.chunks.write();

        if self.documents.remove(id).is_none() {
            return Ok(false);
        }
        table.rows.retain(|row| row.chunk.document_id != *id);

        Ok(true)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.chunks.read().rows.len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
