//! Scripture Search - BM25 lexical search over scripture passages
//!
//! A retrieval pipeline for a corpus of short religious-text
//! passages: repairs text-encoding corruption, normalizes and splits
//! documents into overlapping chunks, indexes the chunks for
//! term-frequency ranking, and answers free-text queries with
//! BM25-ranked chunks plus provenance metadata.
//!
//! # Architecture
//!
//! Data flows strictly forward through the modules:
//!
//! - **indexer**: encoding repair, normalization, chunking
//! - **search**: tokenization, inverted index, BM25 ranking
//! - **engine**: pipeline orchestration and the query API
//!
//! Corpus acquisition, document persistence, answer generation, and
//! interactive front ends are external collaborators; the engine
//! consumes a plain sequence of [`Document`] records and exposes
//! [`SearchEngine::search`].
//!
//! # Example
//!
//! ```
//! use scripture_search::{Config, Document, SearchEngine};
//!
//! let mut engine = SearchEngine::new(Config::default()).unwrap();
//! engine
//!     .build_corpus(vec![Document {
//!         collection: "Dhp".to_string(),
//!         title: "The Pairs".to_string(),
//!         raw_text: "The mind precedes all things.".to_string(),
//!         source_url: "https://example.org/Dhp/1".to_string(),
//!     }])
//!     .unwrap();
//!
//! let response = engine.search("mind", None).unwrap();
//! assert_eq!(response.count, 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod indexer;
pub mod search;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{Bm25Config, ChunkingConfig, Config, SearchConfig};
pub use engine::SearchEngine;
pub use error::{Result, ScriptureError};
pub use types::*;
