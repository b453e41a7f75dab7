//! Lexical n-gram features, optionally fused with lexicon intensities.

pub mod builder;
pub mod matrix;
pub mod vocabulary;

pub use builder::{intensity_block, FeatureBuilder};
pub use matrix::{ColumnKind, FeatureMatrix};
pub use vocabulary::{ngrams, NgramRange, Vocabulary};
