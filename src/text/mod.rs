//! Tokenization and lexicon services consumed by feature building.

pub mod lexicon;
pub mod tokenizer;

pub use lexicon::{IntensityLexicon, Lexicon};
pub use tokenizer::{BasicTokenizer, TokenMode, Tokenizer};
