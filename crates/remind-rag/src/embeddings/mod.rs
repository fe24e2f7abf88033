//! Embedding orchestration: normalization and batched provider calls

mod embedder;
mod normalize;

pub use embedder::Embedder;
pub use normalize::{l2_norm, l2_normalize, l2_normalize_in_place};
