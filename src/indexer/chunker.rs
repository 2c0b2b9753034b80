//! Overlapping, boundary-aware text chunking.
//!
//! Splits a document's `clean_text` into windows of at most
//! `chunk_size` characters with `overlap` characters shared between
//! consecutive windows. Within each window the chunker prefers to
//! break at a paragraph boundary, then after sentence punctuation,
//! then at whitespace, and hard-cuts only when the window contains
//! no boundary at all.
//!
//! All sizes are measured in **characters**, not bytes, so chunk
//! boundaries always fall on valid UTF-8 character boundaries.

use crate::error::{Result, ScriptureError};
use crate::types::Chunk;

/// Boundary-aware text chunker.
///
/// Guarantees: chunks fully cover the input with no gaps, offsets are
/// non-decreasing, a document shorter than `chunk_size` produces
/// exactly one chunk, and the final chunk may be shorter than
/// `chunk_size`.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Maximum characters per chunk
    chunk_size: usize,

    /// Characters shared between consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptureError::InvalidConfiguration`] if
    /// `chunk_size` is zero or `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ScriptureError::InvalidConfiguration(
                "chunk_size must be non-zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ScriptureError::InvalidConfiguration(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk a document's clean text into overlapping segments.
    ///
    /// Chunk ids are assigned sequentially starting at
    /// `first_chunk_id`, ascending with `start_offset`. Empty text
    /// produces no chunks.
    pub fn chunk_document(
        &self,
        document_id: u64,
        clean_text: &str,
        first_chunk_id: u64,
    ) -> Vec<Chunk> {
        let chars: Vec<char> = clean_text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let window_end = (start + self.chunk_size).min(chars.len());
            let brk = if window_end == chars.len() {
                // Final chunk takes everything that remains
                chars.len()
            } else {
                find_break(&chars, start, window_end)
            };

            chunks.push(Chunk {
                chunk_id: first_chunk_id + chunks.len() as u64,
                document_id,
                text: chars[start..brk].iter().collect(),
                start_offset: start,
                length: brk - start,
            });

            if brk == chars.len() {
                break;
            }

            // Step back by the overlap, but always advance so the
            // loop terminates even when the break lands close to the
            // current start.
            let next = brk.saturating_sub(self.overlap);
            start = if next > start { next } else { brk };
        }

        chunks
    }
}

/// Pick the break position for the window `chars[start..end]`.
///
/// Scans right-to-left for the best available boundary: paragraph
/// break first, then sentence-ending punctuation, then whitespace.
/// Returns `end` (a hard character cut) when the window has none.
fn find_break(chars: &[char], start: usize, end: usize) -> usize {
    // Paragraph: break after a blank line
    for i in (start + 2..=end).rev() {
        if chars[i - 1] == '\n' && chars[i - 2] == '\n' {
            return i;
        }
    }

    // Sentence: break after terminal punctuation
    for i in (start + 1..=end).rev() {
        if matches!(chars[i - 1], '.' | '!' | '?') {
            return i;
        }
    }

    // Word: break after whitespace
    for i in (start + 1..=end).rev() {
        if chars[i - 1].is_whitespace() {
            return i;
        }
    }

    end
}
