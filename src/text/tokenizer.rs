//! Reference tokenization service.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

/// The two fixed configurations the pipeline tokenizes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// Stemmed tokens feeding the n-gram vocabulary.
    Stemmed,
    /// Non-stemmed, lemmatized tokens feeding lexicon lookups.
    Lemmatized,
}

/// Text to normalized token sequence.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, stem: bool, lemmatize: bool) -> Vec<String>;

    fn tokenize_as(&self, text: &str, mode: TokenMode) -> Vec<String> {
        match mode {
            TokenMode::Stemmed => self.tokenize(text, true, false),
            TokenMode::Lemmatized => self.tokenize(text, false, true),
        }
    }
}

/// Lower-cased word tokens with optional Snowball stemming or suffix-rule
/// lemmatization.
pub struct BasicTokenizer {
    stemmer: Stemmer,
}

impl Default for BasicTokenizer {
    fn default() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl std::fmt::Debug for BasicTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicTokenizer").finish_non_exhaustive()
    }
}

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

impl Tokenizer for BasicTokenizer {
    fn tokenize(&self, text: &str, stem: bool, lemmatize: bool) -> Vec<String> {
        let lower = text.to_lowercase();
        WORD.find_iter(&lower)
            .map(|m| {
                let word = m.as_str();
                if stem {
                    self.stemmer.stem(word).into_owned()
                } else if lemmatize {
                    lemmatize_word(word)
                } else {
                    word.to_string()
                }
            })
            .collect()
    }
}

/// Strip regular plural inflections; anything irregular passes through.
fn lemmatize_word(word: &str) -> String {
    let chars = word.chars().count();
    if chars > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("sses") {
            return format!("{stem}ss");
        }
    }
    if chars > 3
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stemmed_mode_reduces_inflections() {
        let tokenizer = BasicTokenizer::default();
        let tokens = tokenizer.tokenize_as("I am THRILLED and surprised!", TokenMode::Stemmed);
        assert_eq!(tokens, vec!["i", "am", "thrill", "and", "surpris"]);
    }

    #[test]
    fn lemmatized_mode_keeps_surface_forms() {
        let tokenizer = BasicTokenizer::default();
        let tokens = tokenizer.tokenize_as("Worries and fears, glass bus", TokenMode::Lemmatized);
        assert_eq!(tokens, vec!["worry", "and", "fear", "glass", "bus"]);
    }
}
