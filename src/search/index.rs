//! Tokenization and the inverted index.
//!
//! The index maps each term to its posting list (chunk id + term
//! frequency) and carries the per-chunk and corpus-wide length
//! statistics BM25 scoring needs. It is built once per corpus
//! snapshot and read-only afterwards; any corpus change requires a
//! full rebuild.

use crate::types::Chunk;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

/// Lowercase a text and split it into alphanumeric token runs.
///
/// No stemming and no stopword removal: behavior stays predictable
/// and language-agnostic. Queries and chunks go through this same
/// function so index-time and query-time terms always agree.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// One (chunk, frequency) entry in a term's posting list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Chunk containing the term
    pub chunk_id: u64,

    /// Number of occurrences of the term in that chunk
    pub term_frequency: u32,
}

/// Term → posting-list index over a fixed chunk set.
///
/// Posting lists are ordered by ascending chunk id because chunks
/// are consumed in id order at build time; together with per-query
/// term ordering this makes scoring fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    /// Term → postings, ascending by chunk id
    postings: HashMap<String, Vec<Posting>>,

    /// Token count per chunk, keyed by chunk id
    chunk_lengths: HashMap<u64, u32>,

    /// Mean token count across all chunks (0.0 for an empty index)
    avg_chunk_length: f64,
}

impl InvertedIndex {
    /// Build an index from a chunk sequence.
    ///
    /// An empty sequence yields a valid empty index; querying it
    /// returns no results rather than an error.
    pub fn build(chunks: &[Chunk]) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut chunk_lengths = HashMap::with_capacity(chunks.len());
        let mut total_tokens: u64 = 0;

        for chunk in chunks {
            let tokens = tokenize(&chunk.text);
            total_tokens += tokens.len() as u64;
            chunk_lengths.insert(chunk.chunk_id, tokens.len() as u32);

            let mut frequencies: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *frequencies.entry(token).or_insert(0) += 1;
            }

            // One posting per distinct (term, chunk) pair; chunks
            // arrive in ascending id order, so lists stay sorted.
            for (term, term_frequency) in frequencies {
                postings.entry(term).or_default().push(Posting {
                    chunk_id: chunk.chunk_id,
                    term_frequency,
                });
            }
        }

        let avg_chunk_length = if chunks.is_empty() {
            0.0
        } else {
            total_tokens as f64 / chunks.len() as f64
        };

        Self {
            postings,
            chunk_lengths,
            avg_chunk_length,
        }
    }

    /// Posting list for a term, or `None` if the term is unindexed
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.postings.get(term).map(|p| p.as_slice())
    }

    /// Number of distinct chunks containing the term
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |p| p.len())
    }

    /// Token count of a chunk
    pub fn chunk_length(&self, chunk_id: u64) -> u32 {
        self.chunk_lengths.get(&chunk_id).copied().unwrap_or(0)
    }

    /// Mean token count across all chunks
    pub fn avg_chunk_length(&self) -> f64 {
        self.avg_chunk_length
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunk_lengths.len()
    }

    /// Returns `true` if no chunks have been indexed
    pub fn is_empty(&self) -> bool {
        self.chunk_lengths.is_empty()
    }
}
