//! Ranked retrieval: tokenization, inverted index, BM25 scoring.

mod index;
mod ranker;

pub use index::{tokenize, InvertedIndex, Posting};
pub use ranker::{RankedChunk, Ranker};
