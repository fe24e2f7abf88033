//! Recursive text chunking with overlap
//!
//! Text is cut at the coarsest boundary that occurs in it (paragraph, line,
//! sentence, word, then single character). Pieces small enough are merged
//! greedily into chunks of at most `chunk_size` characters; pieces that are
//! still too long are split again at the next finer boundary. Consecutive
//! chunks share up to `overlap` characters of whole pieces.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;

/// Places where text may be cut, coarsest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Paragraph,
    Line,
    Sentence,
    Word,
    Character,
}

const BOUNDARIES: [Boundary; 5] = [
    Boundary::Paragraph,
    Boundary::Line,
    Boundary::Sentence,
    Boundary::Word,
    Boundary::Character,
];

impl Boundary {
    fn occurs_in(self, text: &str) -> bool {
        match self {
            Boundary::Paragraph => text.contains("\n\n"),
            Boundary::Line => text.contains('\n'),
            Boundary::Sentence => !sentence_ends(text).is_empty(),
            Boundary::Word => text.contains(' '),
            Boundary::Character => !text.is_empty(),
        }
    }

    /// Split `text` into pieces, each ending with the separator that closed it.
    /// Concatenating the pieces gives back `text`.
    fn split(self, text: &str) -> Vec<&str> {
        let cuts: Vec<usize> = match self {
            Boundary::Paragraph => text.match_indices("\n\n").map(|(i, _)| i + 2).collect(),
            Boundary::Line => text.match_indices('\n').map(|(i, _)| i + 1).collect(),
            Boundary::Sentence => sentence_ends(text),
            Boundary::Word => text.match_indices(' ').map(|(i, _)| i + 1).collect(),
            Boundary::Character => {
                return text
                    .char_indices()
                    .map(|(i, c)| &text[i..i + c.len_utf8()])
                    .collect();
            }
        };

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut start = 0;
        for cut in cuts {
            if cut > start {
                pieces.push(&text[start..cut]);
                start = cut;
            }
        }
        if start < text.len() {
            pieces.push(&text[start..]);
        }
        pieces
    }
}

/// Byte offsets just past each `.`, `!` or `?` that is followed by a space
fn sentence_ends(text: &str) -> Vec<usize> {
    text.as_bytes()
        .windows(2)
        .enumerate()
        .filter(|(_, w)| matches!(w[0], b'.' | b'!' | b'?') && w[1] == b' ')
        .map(|(i, _)| i + 2)
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Text chunker with configurable size and overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Target overlap between consecutive chunks
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

impl TextChunker {
    /// Create a new chunker; overlap is clamped below the chunk size
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split text into trimmed, non-empty chunks in source order
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        if char_len(trimmed) <= self.chunk_size {
            return vec![trimmed.to_string()];
        }

        self.split_recursive(trimmed, &BOUNDARIES)
    }

    fn split_recursive(&self, text: &str, boundaries: &[Boundary]) -> Vec<String> {
        let Some(pos) = boundaries.iter().position(|b| b.occurs_in(text)) else {
            return Self::finish(text).into_iter().collect();
        };
        let boundary = boundaries[pos];
        let finer = &boundaries[pos + 1..];

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in boundary.split(text) {
            if char_len(piece) <= self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }
            if finer.is_empty() {
                chunks.extend(Self::finish(piece));
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }
        chunks
    }

    /// Greedily pack pieces (each at most `chunk_size` long) into chunks,
    /// carrying trailing pieces forward as overlap
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                chunks.extend(Self::finish_window(&window));

                while total > self.overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        chunks.extend(Self::finish_window(&window));
        chunks
    }

    fn finish_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
        let joined: String = window.iter().map(|(piece, _)| *piece).collect();
        Self::finish(&joined)
    }

    fn finish(text: &str) -> Option<String> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
