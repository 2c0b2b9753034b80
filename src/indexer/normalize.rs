//! Text repair and normalization.
//!
//! Scraped scripture pages frequently carry mojibake: the page was
//! UTF-8 encoded but got decoded as Latin-1 somewhere along the way,
//! turning Pali diacritics (ā, ī, ū, ṃ) into byte pairs like "Ä\u{81}".
//! [`repair_and_normalize`] undoes that corruption where possible and
//! derives a diacritic-free search key from the repaired text.
//!
//! Both steps are pure functions: the same input always yields the
//! same output, which the index determinism guarantee depends on.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Output of [`repair_and_normalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Encoding-repaired text with diacritics preserved, for display
    pub display_text: String,

    /// Diacritic-stripped, whitespace-collapsed text, for matching
    pub clean_text: String,
}

/// Repair encoding corruption and derive the normalized search key.
///
/// Empty or whitespace-only input yields an empty `clean_text`;
/// callers exclude such documents from chunking.
pub fn repair_and_normalize(raw: &str) -> NormalizedText {
    let display_text = repair_encoding(raw);
    let clean_text = clean(&display_text);
    NormalizedText {
        display_text,
        clean_text,
    }
}

/// Attempt to undo Latin-1 mis-decoding of UTF-8 text.
///
/// Mirrors the original heuristic: re-encode the string as Latin-1
/// bytes and re-decode as UTF-8. Strings containing any character
/// above U+00FF were never Latin-1 decoded, so they pass through
/// unchanged, as does anything whose Latin-1 bytes are not valid
/// UTF-8 (re-decoding those as Latin-1 is the identity).
pub fn repair_encoding(raw: &str) -> String {
    if raw.chars().any(|c| c as u32 > 0xFF) {
        return raw.to_string();
    }

    let bytes: Vec<u8> = raw.chars().map(|c| c as u8).collect();
    match String::from_utf8(bytes) {
        Ok(repaired) => repaired,
        Err(_) => {
            tracing::debug!("encoding repair failed, keeping original text");
            raw.to_string()
        }
    }
}

/// Strip diacritics, collapse whitespace runs, and trim.
///
/// Diacritics are removed by NFKD decomposition followed by dropping
/// combining marks (ā → a, ṃ → m). Characters without a decomposition
/// pass through; they tokenize identically at index and query time,
/// so matching is unaffected.
fn clean(text: &str) -> String {
    let stripped: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    WHITESPACE_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}
