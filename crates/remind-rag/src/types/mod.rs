//! Core types for the RAG pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, DocumentSummary, NewChunk};
pub use query::QueryRequest;
pub use response::{DeleteResponse, IngestResult, QueryResult, RetrievedSource};
