//! Error types for the scripture search engine.
//!
//! Only [`ScriptureError::InvalidConfiguration`] is fatal at an API
//! boundary. Malformed documents are skipped during corpus builds and
//! aggregated into the build report instead of aborting the build;
//! encoding repair failures fall back to the original text.

use thiserror::Error;

/// Result type alias for scripture search operations
pub type Result<T> = std::result::Result<T, ScriptureError>;

/// Main error type for the scripture search engine
#[derive(Error, Debug)]
pub enum ScriptureError {
    /// Rejected before any work begins: bad chunk size/overlap, bad k,
    /// bad BM25 parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A document is missing a required field. Skipped and recorded in
    /// the build report, never fatal to the whole build.
    #[error("Malformed document at position {position}: {reason}")]
    MalformedDocument { position: usize, reason: String },

    /// The corpus contains no usable documents. Warning-level: the
    /// library still builds a valid empty generation.
    #[error("Corpus is empty: {0}")]
    EmptyCorpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ScriptureError {
    /// Check if this error indicates invalid caller input
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ScriptureError::InvalidConfiguration(_) | ScriptureError::MalformedDocument { .. }
        )
    }

    /// Check if this error is non-fatal for a corpus build
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScriptureError::MalformedDocument { .. } | ScriptureError::EmptyCorpus(_)
        )
    }
}
