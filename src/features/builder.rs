//! Vocabulary fitting and per-split feature construction.

use std::collections::BTreeMap;

use ndarray::Array2;
use tracing::{debug, instrument};

use crate::{
    emotion::EMOTION_COUNT,
    error::FeatureError,
    features::{
        matrix::FeatureMatrix,
        vocabulary::{ngrams, NgramRange, Vocabulary},
    },
    text::{Lexicon, TokenMode, Tokenizer},
};

/// Turns tokenized corpora into [`FeatureMatrix`] rows over a frozen vocabulary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder {
    range: NgramRange,
}

impl FeatureBuilder {
    pub fn new(range: NgramRange) -> Self {
        Self { range }
    }

    /// Learn the vocabulary from training tokens only.
    pub fn fit(&self, train_tokens: &[Vec<String>]) -> Result<Vocabulary, FeatureError> {
        Vocabulary::fit(train_tokens, self.range)
    }

    /// Count n-grams of each document over `vocabulary`. Terms outside the
    /// vocabulary are ignored.
    pub fn transform(&self, tokens: &[Vec<String>], vocabulary: &Vocabulary) -> FeatureMatrix {
        let rows: Vec<Vec<(usize, f64)>> = tokens
            .iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for gram in ngrams(doc, vocabulary.range()) {
                    if let Some(col) = vocabulary.index_of(&gram) {
                        *counts.entry(col).or_insert(0.0) += 1.0;
                    }
                }
                counts.into_iter().collect()
            })
            .collect();
        FeatureMatrix::from_counts(vocabulary.clone(), &rows)
    }

    /// Append a dense intensity block (one 8-vector per document).
    pub fn fuse(
        &self,
        lexical: FeatureMatrix,
        intensity: Array2<f64>,
    ) -> Result<FeatureMatrix, FeatureError> {
        lexical.with_intensity(intensity)
    }

    /// Tokenize `texts` in stemmed mode and fit a vocabulary on them.
    pub fn fit_texts<S: AsRef<str>>(
        &self,
        texts: &[S],
        tokenizer: &dyn Tokenizer,
    ) -> Result<Vocabulary, FeatureError> {
        self.fit(&tokenize_all(texts, tokenizer, TokenMode::Stemmed))
    }

    /// Build the feature matrix of one split. With a lexicon, the texts are
    /// tokenized a second time in lemmatized mode and their intensity vectors
    /// become the trailing `raw_<emotion>` columns.
    #[instrument(skip_all, fields(documents = texts.len(), fused = lexicon.is_some()))]
    pub fn featurize<S: AsRef<str>>(
        &self,
        texts: &[S],
        vocabulary: &Vocabulary,
        tokenizer: &dyn Tokenizer,
        lexicon: Option<&dyn Lexicon>,
    ) -> Result<FeatureMatrix, FeatureError> {
        let stemmed = tokenize_all(texts, tokenizer, TokenMode::Stemmed);
        let matrix = self.transform(&stemmed, vocabulary);
        let Some(lexicon) = lexicon else {
            return Ok(matrix);
        };
        let lemmatized = tokenize_all(texts, tokenizer, TokenMode::Lemmatized);
        let block = intensity_block(&lemmatized, lexicon);
        let fused = self.fuse(matrix, block)?;
        debug!(columns = fused.n_cols(), "fused intensity block");
        Ok(fused)
    }
}

/// One intensity row per document, columns in emotion order.
pub fn intensity_block(tokens: &[Vec<String>], lexicon: &dyn Lexicon) -> Array2<f64> {
    let mut block = Array2::zeros((tokens.len(), EMOTION_COUNT));
    for (row, doc) in tokens.iter().enumerate() {
        for (emotion, score) in lexicon.lookup(doc).iter() {
            block[[row, emotion.index()]] = *score;
        }
    }
    block
}

pub(crate) fn tokenize_all<S: AsRef<str>>(
    texts: &[S],
    tokenizer: &dyn Tokenizer,
    mode: TokenMode,
) -> Vec<Vec<String>> {
    texts
        .iter()
        .map(|text| tokenizer.tokenize_as(text.as_ref(), mode))
        .collect()
}
