//! Search engine orchestration.
//!
//! Owns the full pipeline: ingest documents, repair and normalize,
//! deduplicate, chunk, and build the inverted index as one atomic
//! generation. Queries run against a shared reference to the current
//! generation, which is immutable after construction, so any number
//! of searches may execute in parallel without locking.

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::{Result, ScriptureError};
use crate::indexer::{repair_and_normalize, Chunker};
use crate::search::{InvertedIndex, Ranker};
use crate::types::{
    BuildReport, Chunk, Document, NormalizedDocument, SearchResponse, SearchResult,
    SkippedDocument,
};

/// One immutable, fully built snapshot of the corpus.
///
/// Holds the normalized documents, the chunk collection, and the
/// inverted index, all built together and replaced together.
#[derive(Debug, Default)]
struct Generation {
    documents: Vec<NormalizedDocument>,
    chunks: Vec<Chunk>,
    index: InvertedIndex,
}

/// BM25 search engine over a corpus of scripture passages.
///
/// Build a corpus once with [`SearchEngine::build_corpus`], then
/// query it with [`SearchEngine::search`]. Rebuilding replaces the
/// previous generation wholesale; readers never observe a partially
/// built index.
pub struct SearchEngine {
    config: Config,
    chunker: Chunker,
    ranker: Ranker,
    generation: Generation,
}

impl SearchEngine {
    /// Create an engine with an empty corpus.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptureError::InvalidConfiguration`] if the
    /// configuration fails validation.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.overlap)?;
        let ranker = Ranker::new(config.bm25.clone());

        Ok(Self {
            config,
            chunker,
            ranker,
            generation: Generation::default(),
        })
    }

    /// Build a new corpus generation from a document feed.
    ///
    /// Malformed documents (empty mandatory fields) and documents
    /// that normalize to empty text are skipped, logged, and recorded
    /// in the report. Documents whose `clean_text` exactly matches an
    /// earlier document are dropped as duplicates, first occurrence
    /// winning. The new generation replaces the old one only after it
    /// is fully built.
    pub fn build_corpus(&mut self, documents: Vec<Document>) -> Result<BuildReport> {
        let start = Instant::now();
        tracing::info!("Building corpus from {} documents", documents.len());

        let mut normalized: Vec<NormalizedDocument> = Vec::new();
        let mut skipped: Vec<SkippedDocument> = Vec::new();
        let mut seen: HashSet<[u8; 32]> = HashSet::new();
        let mut duplicates_dropped = 0;

        for (position, document) in documents.into_iter().enumerate() {
            if let Err(e) = validate_document(&document, position) {
                tracing::warn!("Skipping document {}: {}", position, e);
                skipped.push(SkippedDocument {
                    position,
                    reason: e.to_string(),
                });
                continue;
            }

            let title = repair_and_normalize(&document.title).display_text;
            let text = repair_and_normalize(&document.raw_text);

            if text.clean_text.is_empty() {
                tracing::warn!(
                    "Skipping document {} ({}): empty after normalization",
                    position,
                    title
                );
                skipped.push(SkippedDocument {
                    position,
                    reason: "empty after normalization".to_string(),
                });
                continue;
            }

            if !seen.insert(fingerprint(&text.clean_text)) {
                tracing::debug!("Dropping duplicate document {} ({})", position, title);
                duplicates_dropped += 1;
                continue;
            }

            normalized.push(NormalizedDocument {
                id: normalized.len() as u64,
                collection: document.collection,
                title,
                display_text: text.display_text,
                clean_text: text.clean_text,
                source_url: document.source_url,
            });
        }

        let mut chunks: Vec<Chunk> = Vec::new();
        for document in &normalized {
            let produced =
                self.chunker
                    .chunk_document(document.id, &document.clean_text, chunks.len() as u64);
            tracing::debug!(
                "Chunked document {} ({}) into {} chunks",
                document.id,
                document.title,
                produced.len()
            );
            chunks.extend(produced);
        }

        let index = InvertedIndex::build(&chunks);

        if chunks.is_empty() {
            tracing::warn!("Corpus is empty; searches will return no results");
        }

        let report = BuildReport {
            documents_ingested: normalized.len(),
            documents_skipped: skipped,
            duplicates_dropped,
            chunks_created: chunks.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            built_at: Utc::now(),
        };

        tracing::info!(
            "Corpus built: {} documents, {} chunks, {} skipped, {} duplicates in {}ms",
            report.documents_ingested,
            report.chunks_created,
            report.documents_skipped.len(),
            report.duplicates_dropped,
            report.duration_ms
        );

        // Swap in the complete generation only once everything is built
        self.generation = Generation {
            documents: normalized,
            chunks,
            index,
        };

        Ok(report)
    }

    /// Search the current generation.
    ///
    /// `k` defaults to the configured `default_k` (10). Ranked chunks
    /// are joined with their document metadata before returning; the
    /// join reads the generation without mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptureError::InvalidConfiguration`] when `k` is
    /// zero. An empty corpus or a query with no indexable terms
    /// yields an empty result list, not an error.
    pub fn search(&self, query: &str, k: Option<usize>) -> Result<SearchResponse> {
        let start = Instant::now();
        let k = k.unwrap_or(self.config.search.default_k);
        if k == 0 {
            return Err(ScriptureError::InvalidConfiguration(
                "k must be at least 1".to_string(),
            ));
        }

        let ranked = self.ranker.rank(&self.generation.index, query, k);

        let results: Vec<SearchResult> = ranked
            .iter()
            .map(|r| {
                let chunk = &self.generation.chunks[r.chunk_id as usize];
                let document = &self.generation.documents[chunk.document_id as usize];
                SearchResult {
                    score: r.score,
                    text: chunk.text.clone(),
                    title: document.title.clone(),
                    collection: document.collection.clone(),
                    source_url: document.source_url.clone(),
                    document_id: document.id,
                    chunk_id: chunk.chunk_id,
                    start_offset: chunk.start_offset,
                }
            })
            .collect();

        let count = results.len();
        tracing::debug!("Query {:?} matched {} chunks", query, count);

        Ok(SearchResponse {
            query: query.to_string(),
            results,
            count,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Number of documents in the current generation
    pub fn document_count(&self) -> usize {
        self.generation.documents.len()
    }

    /// Number of chunks in the current generation
    pub fn chunk_count(&self) -> usize {
        self.generation.chunks.len()
    }

    /// Engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Reject documents with missing mandatory fields
fn validate_document(document: &Document, position: usize) -> Result<()> {
    let missing = if document.collection.trim().is_empty() {
        Some("collection")
    } else if document.title.trim().is_empty() {
        Some("title")
    } else if document.raw_text.trim().is_empty() {
        Some("raw_text")
    } else if document.source_url.trim().is_empty() {
        Some("source_url")
    } else {
        None
    };

    match missing {
        Some(field) => Err(ScriptureError::MalformedDocument {
            position,
            reason: format!("empty {field}"),
        }),
        None => Ok(()),
    }
}

/// SHA-256 fingerprint of a document's clean text, for exact dedup
fn fingerprint(clean_text: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(clean_text.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(collection: &str, title: &str, raw_text: &str) -> Document {
        Document {
            collection: collection.to_string(),
            title: title.to_string(),
            raw_text: raw_text.to_string(),
            source_url: format!("https://example.org/{collection}/{title}"),
        }
    }

    fn engine_with(documents: Vec<Document>) -> (SearchEngine, BuildReport) {
        let mut engine = SearchEngine::new(Config::default()).unwrap();
        let report = engine.build_corpus(documents).unwrap();
        (engine, report)
    }

    #[test]
    fn test_build_and_search_end_to_end() {
        let (engine, report) = engine_with(vec![
            doc("Dhp", "Mind", "The mind precedes all things. Mind is supreme."),
            doc("Dhp", "Body", "The body is impermanent."),
        ]);

        // Both documents fit in a single 500-char chunk each
        assert_eq!(report.documents_ingested, 2);
        assert_eq!(report.chunks_created, 2);

        let response = engine.search("mind", Some(5)).unwrap();
        assert_eq!(response.count, 1);
        let top = &response.results[0];
        assert!(top.score > 0.0);
        assert_eq!(top.title, "Mind");
        assert!(top.text.contains("Mind is supreme"));
    }

    #[test]
    fn test_malformed_documents_skipped_not_fatal() {
        let (engine, report) = engine_with(vec![
            doc("Dhp", "", "Missing a title."),
            doc("Dhp", "Good", "A perfectly good passage."),
            doc("", "NoCollection", "Missing a collection."),
        ]);

        assert_eq!(report.documents_ingested, 1);
        assert_eq!(report.documents_skipped.len(), 2);
        assert_eq!(report.documents_skipped[0].position, 0);
        assert!(report.documents_skipped[0].reason.contains("title"));
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn test_whitespace_only_document_skipped() {
        let (_, report) = engine_with(vec![
            doc("Dhp", "Blank", "   \n\t  "),
            doc("Dhp", "Real", "Actual content."),
        ]);

        assert_eq!(report.documents_ingested, 1);
        assert_eq!(report.documents_skipped.len(), 1);
    }

    #[test]
    fn test_deduplication_first_occurrence_wins() {
        let (engine, report) = engine_with(vec![
            doc("Dhp", "First", "The  mind precedes\nall things."),
            // Different raw whitespace, identical clean_text
            doc("Dhp", "Second", "The mind precedes all things."),
        ]);

        assert_eq!(report.documents_ingested, 1);
        assert_eq!(report.duplicates_dropped, 1);

        let response = engine.search("mind", None).unwrap();
        assert_eq!(response.results[0].title, "First");
    }

    #[test]
    fn test_empty_corpus_search_returns_empty() {
        let (engine, report) = engine_with(vec![]);
        assert_eq!(report.documents_ingested, 0);

        let response = engine.search("anything", Some(5)).unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.count, 0);
    }

    #[test]
    fn test_search_before_build_returns_empty() {
        let engine = SearchEngine::new(Config::default()).unwrap();
        let response = engine.search("mind", None).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_zero_k_rejected() {
        let (engine, _) = engine_with(vec![doc("Dhp", "Mind", "The mind precedes.")]);
        let result = engine.search("mind", Some(0));
        assert!(matches!(
            result,
            Err(ScriptureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_default_k_is_ten() {
        let documents: Vec<Document> = (0..15)
            .map(|i| doc("Dhp", &format!("Passage{i}"), &format!("dhamma text {i}")))
            .collect();
        let (engine, _) = engine_with(documents);

        let response = engine.search("dhamma", None).unwrap();
        assert_eq!(response.count, 10);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut config = Config::default();
        config.chunking.overlap = config.chunking.chunk_size;
        assert!(SearchEngine::new(config).is_err());
    }

    #[test]
    fn test_rebuild_replaces_generation() {
        let (mut engine, _) = engine_with(vec![doc("Dhp", "Old", "the old corpus text")]);
        assert_eq!(engine.document_count(), 1);

        engine
            .build_corpus(vec![
                doc("MN", "NewA", "fresh corpus content"),
                doc("MN", "NewB", "more fresh content"),
            ])
            .unwrap();

        assert_eq!(engine.document_count(), 2);
        let response = engine.search("old", None).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_metadata_join_on_results() {
        let (engine, _) = engine_with(vec![doc("SN", "Kindness", "Loving kindness to all.")]);
        let response = engine.search("kindness", None).unwrap();

        let result = &response.results[0];
        assert_eq!(result.collection, "SN");
        assert_eq!(result.title, "Kindness");
        assert!(result.source_url.contains("SN/Kindness"));
        assert_eq!(result.start_offset, 0);
    }

    #[test]
    fn test_mojibake_repaired_and_searchable() {
        // "ānāpānasati" UTF-8 bytes mis-decoded as Latin-1
        let corrupted = "\u{c4}\u{81}n\u{c4}\u{81}p\u{c4}\u{81}nasati practice";
        let (engine, _) = engine_with(vec![doc("MN", "Breathing", corrupted)]);

        // Diacritic-free query matches the normalized text
        let response = engine.search("anapanasati", None).unwrap();
        assert_eq!(response.count, 1);
        // Display text keeps the repaired diacritics
        assert!(response.results[0].text.contains("anapanasati"));
    }

    #[test]
    fn test_build_report_counts() {
        let (_, report) = engine_with(vec![
            doc("Dhp", "A", "first passage."),
            doc("Dhp", "B", "first passage."),
            doc("Dhp", "", "malformed one"),
        ]);

        assert_eq!(report.documents_ingested, 1);
        assert_eq!(report.duplicates_dropped, 1);
        assert_eq!(report.documents_skipped.len(), 1);
        assert_eq!(report.chunks_created, 1);
    }
}
