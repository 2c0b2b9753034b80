//! Core data types for the scripture search engine.
//!
//! This module defines the data structures that flow through the
//! pipeline: raw documents, normalized documents, chunks, search
//! results, and corpus build reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw document as delivered by the acquisition collaborator.
///
/// All four fields are mandatory; documents with empty fields are
/// rejected as malformed during corpus builds. Document ids are
/// assigned by the engine at ingest time, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Collection the passage belongs to (e.g. "MN", "DN")
    pub collection: String,

    /// Passage title
    pub title: String,

    /// Raw text, possibly with encoding corruption
    pub raw_text: String,

    /// URL the passage was scraped from
    pub source_url: String,
}

/// A document after encoding repair and normalization.
///
/// `clean_text` is always derivable deterministically from
/// `display_text`; it exists only for tokenization and matching,
/// while `display_text` is what callers present to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Stable id, unique within one corpus generation
    pub id: u64,

    /// Collection the passage belongs to
    pub collection: String,

    /// Passage title (encoding-repaired)
    pub title: String,

    /// Repaired text with diacritics preserved, for presentation
    pub display_text: String,

    /// Diacritic-stripped, whitespace-collapsed text, for matching
    pub clean_text: String,

    /// URL the passage was scraped from
    pub source_url: String,
}

/// A bounded, overlapping substring of a document's `clean_text`.
///
/// The atomic retrieval unit. Offsets and lengths are measured in
/// characters, not bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Global id, sequential and ascending across the generation
    pub chunk_id: u64,

    /// Back-reference to the source [`NormalizedDocument`]
    pub document_id: u64,

    /// Chunk text content
    pub text: String,

    /// Character offset into `clean_text` where this chunk begins
    pub start_offset: usize,

    /// Length in characters
    pub length: usize,
}

/// A ranked chunk with its document metadata snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// BM25 relevance score (higher = more relevant)
    pub score: f32,

    /// Matched chunk text
    pub text: String,

    /// Title of the source document
    pub title: String,

    /// Collection of the source document
    pub collection: String,

    /// URL of the source document
    pub source_url: String,

    /// Source document id
    pub document_id: u64,

    /// Matched chunk id
    pub chunk_id: u64,

    /// Character offset of the chunk within the document
    pub start_offset: usize,
}

/// Response from a search operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Original query string
    pub query: String,

    /// Ranked results, best first
    pub results: Vec<SearchResult>,

    /// Number of results returned
    pub count: usize,

    /// Query duration in milliseconds
    pub duration_ms: u64,
}

/// A document dropped during a corpus build, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Position of the document in the input feed
    pub position: usize,

    /// Why the document was skipped
    pub reason: String,
}

/// Statistics from a corpus build.
///
/// Per-document failures are aggregated here rather than aborting
/// the whole build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Documents that made it into the generation
    pub documents_ingested: usize,

    /// Documents skipped (malformed or empty after normalization)
    pub documents_skipped: Vec<SkippedDocument>,

    /// Documents dropped as exact clean-text duplicates
    pub duplicates_dropped: usize,

    /// Total chunks created
    pub chunks_created: usize,

    /// Build duration in milliseconds
    pub duration_ms: u64,

    /// When the generation was built
    pub built_at: DateTime<Utc>,
}
