//! Corpus ingestion and holdout splitting.

pub mod corpus;
pub mod split;

pub use corpus::{read_corpus, read_corpus_from, Document};
pub use split::{stratified_split, Split};
