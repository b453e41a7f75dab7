//! Frozen n-gram vocabulary learned from a training split.

use std::{collections::BTreeSet, sync::Arc};

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::error::FeatureError;

/// Unigrams shorter than this are dropped before n-grams are formed.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Inclusive n-gram length range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NgramRange {
    min: usize,
    max: usize,
}

impl NgramRange {
    pub fn new(min: usize, max: usize) -> Result<Self, FeatureError> {
        if min == 0 || min > max {
            return Err(FeatureError::NgramRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for NgramRange {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// Word n-grams of one token sequence, space-joined, in positional order.
pub fn ngrams(tokens: &[String], range: NgramRange) -> Vec<String> {
    let words: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .collect();
    let mut out = Vec::new();
    for n in range.min..=range.max {
        if words.len() < n {
            break;
        }
        out.extend(words.windows(n).map(|window| window.join(" ")));
    }
    out
}

/// Ordered set of n-gram terms defining the lexical column space.
///
/// Cloning shares the underlying term table. There is no way to add terms
/// after [`Vocabulary::fit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Arc<IndexSet<String>>,
    range: NgramRange,
}

impl Vocabulary {
    /// Collect every n-gram of the training documents, sorted lexicographically.
    pub fn fit(docs: &[Vec<String>], range: NgramRange) -> Result<Self, FeatureError> {
        let mut seen = BTreeSet::new();
        for doc in docs {
            seen.extend(ngrams(doc, range));
        }
        if seen.is_empty() {
            return Err(FeatureError::EmptyVocabulary);
        }
        debug!(terms = seen.len(), "built vocabulary");
        Ok(Self {
            terms: Arc::new(seen.into_iter().collect()),
            range,
        })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn range(&self) -> NgramRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn ngrams_skip_single_character_tokens() {
        let grams = ngrams(&toks("i am furious"), NgramRange::new(1, 2).unwrap());
        assert_eq!(grams, vec!["am", "furious", "am furious"]);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(NgramRange::new(0, 2).is_err());
        assert!(NgramRange::new(3, 2).is_err());
    }

    #[test]
    fn vocabulary_is_sorted_and_deduplicated() {
        let docs = vec![toks("zeta alpha"), toks("alpha zeta")];
        let vocab = Vocabulary::fit(&docs, NgramRange::new(1, 1).unwrap()).unwrap();
        assert_eq!(vocab.terms().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(vocab.index_of("zeta"), Some(1));
        assert_eq!(vocab.index_of("omega"), None);
    }

    #[test]
    fn empty_corpus_has_no_vocabulary() {
        let docs = vec![toks("a b c")];
        assert_eq!(
            Vocabulary::fit(&docs, NgramRange::default()),
            Err(FeatureError::EmptyVocabulary)
        );
    }
}
