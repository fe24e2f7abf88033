//! remind-rag: question answering over uploaded text documents
//!
//! Documents are split into overlapping chunks, embedded, and stored in a
//! retrieval index. A question is embedded the same way, the most similar
//! chunks are retrieved by exact cosine similarity, and a language model is
//! asked to answer using only those chunks.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{
    document::{Chunk, Document, DocumentSummary},
    response::{IngestResult, QueryResult, RetrievedSource},
};
