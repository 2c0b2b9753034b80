//! BM25 ranking over the inverted index.
//!
//! Scores candidate chunks with the Okapi BM25 formula. Per matched
//! term the contribution grows with in-chunk term frequency but
//! saturates (controlled by `k1`), is dampened for chunks longer than
//! the corpus mean (controlled by `b`), and is weighted by inverse
//! document frequency so rarer terms count for more.
//!
//! The idf uses the non-negative `ln(1 + (N - df + 0.5) / (df + 0.5))`
//! form: halving a term's document frequency strictly increases its
//! per-occurrence weight, and no term can subtract from a score.

use crate::config::Bm25Config;
use crate::search::index::{tokenize, InvertedIndex};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A candidate chunk with its accumulated BM25 score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedChunk {
    /// Chunk id into the generation's chunk collection
    pub chunk_id: u64,

    /// Total BM25 score, summed over matched query terms
    pub score: f32,
}

/// BM25 lexical ranker
#[derive(Debug, Clone)]
pub struct Ranker {
    params: Bm25Config,
}

impl Ranker {
    /// Create a ranker with the given BM25 parameters
    pub fn new(params: Bm25Config) -> Self {
        Self { params }
    }

    /// Rank chunks against a query, returning at most `k` results.
    ///
    /// The query is tokenized exactly like chunks were at index time.
    /// Only chunks matching at least one query term are scored;
    /// queries that tokenize to nothing return an empty list. Results
    /// are ordered by descending score, ties broken by ascending
    /// chunk id so repeated queries are reproducible.
    pub fn rank(&self, index: &InvertedIndex, query: &str, k: usize) -> Vec<RankedChunk> {
        let terms = tokenize(query);
        if terms.is_empty() || index.is_empty() {
            return Vec::new();
        }

        let total_chunks = index.len() as f64;
        let avg_length = index.avg_chunk_length();
        let mut scores: HashMap<u64, f64> = HashMap::new();

        for term in &terms {
            let Some(postings) = index.postings(term) else {
                continue;
            };

            let df = postings.len() as f64;
            let idf = (1.0 + (total_chunks - df + 0.5) / (df + 0.5)).ln();

            for posting in postings {
                let tf = f64::from(posting.term_frequency);
                let length = f64::from(index.chunk_length(posting.chunk_id));
                let norm = 1.0 - self.params.b + self.params.b * length / avg_length;
                let contribution =
                    idf * tf * (self.params.k1 + 1.0) / (tf + self.params.k1 * norm);
                *scores.entry(posting.chunk_id).or_insert(0.0) += contribution;
            }
        }

        let mut ranked: Vec<RankedChunk> = scores
            .into_iter()
            .map(|(chunk_id, score)| RankedChunk {
                chunk_id,
                score: score as f32,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        ranked.truncate(k);
        ranked
    }
}
