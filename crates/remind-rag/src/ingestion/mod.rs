//! Document ingestion: upload checks and text chunking

mod chunker;
mod upload;

pub use chunker::TextChunker;
pub use upload::{decode_text_upload, is_plain_text};
