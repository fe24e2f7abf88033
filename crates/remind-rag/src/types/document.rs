//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded text document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename
    pub filename: String,
    /// Full text as uploaded
    pub content: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document stamped with the current time
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            content: content.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// A stored passage of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Index-assigned ID, increasing in insertion order
    pub id: i64,
    /// Parent document
    pub document_id: Uuid,
    /// 0-based position within the document
    pub chunk_index: u32,
    /// Passage text
    pub content: String,
}

/// A chunk and its embedding before the index assigns an ID
#[derive(Debug, Clone, PartialEq)]
pub struct NewChunk {
    pub chunk_index: u32,
    pub content: String,
    pub embedding: Vec<f32>,
}

impl NewChunk {
    pub fn new(chunk_index: u32, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            chunk_index,
            content: content.into(),
            embedding,
        }
    }
}

/// Document listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub chunk_count: usize,
}

impl DocumentSummary {
    pub fn from_document(doc: &Document, chunk_count: usize) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            uploaded_at: doc.uploaded_at,
            chunk_count,
        }
    }
}
