//! Common test fixtures for integration tests

use scripture_search::{Config, Document, SearchEngine};

/// A small scripture corpus with known contents
pub fn sample_documents() -> Vec<Document> {
    vec![
        document(
            "Dhp",
            "The Pairs",
            "The mind precedes all things. Mind is supreme. \
             Speak or act with a corrupted mind and suffering follows.",
        ),
        document(
            "SN",
            "Impermanence",
            "The body is impermanent. Feeling is impermanent. \
             Perception is impermanent.",
        ),
        document(
            "MN",
            "Mindfulness of Breathing",
            "Mindfulness of breathing, when developed and pursued, \
             is of great fruit and great benefit.",
        ),
    ]
}

pub fn document(collection: &str, title: &str, raw_text: &str) -> Document {
    Document {
        collection: collection.to_string(),
        title: title.to_string(),
        raw_text: raw_text.to_string(),
        source_url: format!("https://example.org/suttas/{collection}/{title}"),
    }
}

/// Build an engine with default configuration over the given feed
pub fn engine_with(documents: Vec<Document>) -> SearchEngine {
    let mut engine = SearchEngine::new(Config::default()).unwrap();
    engine.build_corpus(documents).unwrap();
    engine
}
