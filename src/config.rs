//! Configuration for the scripture search engine.
//!
//! Handles loading configuration from TOML files and environment
//! variables, with sensible defaults for all settings. All values
//! are validated before any pipeline work begins.

use crate::error::{Result, ScriptureError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub bm25: Bm25Config,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Number of results to return when the caller does not pass k
    #[serde(default = "default_k")]
    pub default_k: usize,
}

/// BM25 free parameters.
///
/// Defaults match the rank-bm25 library the original retriever was
/// built on: `k1 = 1.5` controls term-frequency saturation, `b = 0.75`
/// controls chunk-length normalization.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bm25Config {
    /// Term-frequency saturation constant (must be > 0)
    #[serde(default = "default_k1")]
    pub k1: f64,

    /// Length-normalization constant (must be in [0, 1])
    #[serde(default = "default_b")]
    pub b: f64,
}

// Default value functions
fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_k() -> usize {
    10
}

fn default_k1() -> f64 {
    1.5
}

fn default_b() -> f64 {
    0.75
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
        }
    }
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: default_k1(),
            b: default_b(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptureError::InvalidConfiguration(format!("Failed to read config file: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// Priority order:
    /// 1. SCRIPTURE_CONFIG env var pointing at a TOML file
    /// 2. ./scripture.toml
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("SCRIPTURE_CONFIG") {
            Self::from_file(config_path)?
        } else if Path::new("scripture.toml").exists() {
            Self::from_file("scripture.toml")?
        } else {
            Self::default()
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(chunk_size) = env::var("SCRIPTURE_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.chunking.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("SCRIPTURE_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.chunking.overlap = o;
            }
        }
        if let Ok(default_k) = env::var("SCRIPTURE_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(ScriptureError::InvalidConfiguration(
                "chunk_size must be non-zero".to_string(),
            ));
        }

        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(ScriptureError::InvalidConfiguration(
                "overlap must be less than chunk_size".to_string(),
            ));
        }

        if self.search.default_k == 0 {
            return Err(ScriptureError::InvalidConfiguration(
                "default_k must be at least 1".to_string(),
            ));
        }

        if self.bm25.k1 <= 0.0 || !self.bm25.k1.is_finite() {
            return Err(ScriptureError::InvalidConfiguration(
                "bm25 k1 must be a positive finite number".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.bm25.b) {
            return Err(ScriptureError::InvalidConfiguration(
                "bm25 b must be in [0, 1]".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration at info level
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.chunking.chunk_size);
        tracing::info!("  Overlap: {} chars", self.chunking.overlap);
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  BM25 k1: {}, b: {}", self.bm25.k1, self.bm25.b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.overlap, 50);
        assert_eq!(config.search.default_k, 10);
        assert_eq!(config.bm25.k1, 1.5);
        assert_eq!(config.bm25.b, 0.75);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_overlap() {
        let mut config = Config::default();
        config.chunking.overlap = 600; // Greater than chunk_size
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_overlap_equals_chunk_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 10;
        config.chunking.overlap = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_chunk_size() {
        let mut config = Config::default();
        config.chunking.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_k() {
        let mut config = Config::default();
        config.search.default_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_bm25() {
        let mut config = Config::default();
        config.bm25.k1 = 0.0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.bm25.b = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_override() {
        env::set_var("SCRIPTURE_CHUNK_SIZE", "1024");

        let mut config = Config::default();
        config.merge_env();

        assert_eq!(config.chunking.chunk_size, 1024);

        // Cleanup
        env::remove_var("SCRIPTURE_CHUNK_SIZE");
    }

    #[test]
    fn test_toml_deserialization() {
        let toml = r#"
            [chunking]
            chunk_size = 256
            overlap = 32

            [search]
            default_k = 20

            [bm25]
            k1 = 1.2
            b = 0.5
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chunking.chunk_size, 256);
        assert_eq!(config.chunking.overlap, 32);
        assert_eq!(config.search.default_k, 20);
        assert_eq!(config.bm25.k1, 1.2);
        assert_eq!(config.bm25.b, 0.5);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [chunking]
            chunk_size = 300
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.chunking.overlap, 50);
        assert_eq!(config.search.default_k, 10);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ndefault_k = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.default_k, 3);
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/scripture.toml");
        assert!(matches!(
            result,
            Err(ScriptureError::InvalidConfiguration(_))
        ));
    }
}
