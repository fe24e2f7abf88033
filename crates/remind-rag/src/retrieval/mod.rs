//! Exact nearest-neighbour retrieval

pub mod memory;
pub mod search;

pub use memory::InMemoryVectorStore;
pub use search::{cosine_similarity, select_top_k};
