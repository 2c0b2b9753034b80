//! Document preparation: encoding repair, normalization, chunking.
//!
//! Everything upstream of the index lives here. The pipeline runs
//! strictly forward: raw documents are repaired and normalized, then
//! split into overlapping chunks that the search module indexes.

mod chunker;
mod normalize;

pub use chunker::Chunker;
pub use normalize::{repair_and_normalize, repair_encoding, NormalizedText};
