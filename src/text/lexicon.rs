//! Emotion-intensity lexicon service and its file-backed implementation.

use std::{collections::HashMap, io::Read, path::Path};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::{
    emotion::{Emotion, EmotionMap},
    error::DataError,
};

/// Token → per-emotion intensity lookup.
pub trait Lexicon: Send + Sync {
    /// Intensity vector of a single normalized token, if it is an emotion word.
    fn intensity(&self, token: &str) -> Option<&EmotionMap<f64>>;

    /// Document intensity: element-wise sum over tokens. Unknown tokens add zero.
    fn lookup(&self, tokens: &[String]) -> EmotionMap<f64> {
        let mut total = EmotionMap::<f64>::default();
        for scores in tokens.iter().filter_map(|token| self.intensity(token)) {
            for (emotion, score) in scores.iter() {
                total[emotion] += score;
            }
        }
        total
    }

    /// Number of emotion-bearing tokens in the document.
    fn word_count(&self, tokens: &[String]) -> usize {
        tokens
            .iter()
            .filter(|token| self.intensity(token).is_some())
            .count()
    }
}

/// In-memory intensity lexicon.
#[derive(Debug, Clone, Default)]
pub struct IntensityLexicon {
    entries: HashMap<String, EmotionMap<f64>>,
}

impl IntensityLexicon {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Emotion, f64)>) -> Self {
        let mut lexicon = Self::default();
        for (word, emotion, score) in entries {
            lexicon.insert(word, emotion, score);
        }
        lexicon
    }

    pub fn insert(&mut self, word: &str, emotion: Emotion, score: f64) {
        self.entries.entry(word.to_lowercase()).or_default()[emotion] = score;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a `word<TAB>emotion<TAB>score` file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let lexicon = Self::load_from(std::fs::File::open(path)?)?;
        info!(path = %path.display(), words = lexicon.len(), "loaded intensity lexicon");
        Ok(lexicon)
    }

    /// Parse lexicon rows from any reader. A header line and categories that
    /// are not one of the eight emotions (e.g. `positive`) are skipped.
    pub fn load_from<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut lexicon = Self::default();
        let mut skipped = 0usize;
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let (Some(word), Some(category), Some(score)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                skipped += 1;
                continue;
            };
            let Some(emotion) = Emotion::from_name(category.trim()) else {
                skipped += 1;
                continue;
            };
            let score: f64 = score.trim().parse().map_err(|_| DataError::LexiconScore {
                line: idx + 1,
                value: score.to_string(),
            })?;
            lexicon.insert(word.trim(), emotion, score);
        }
        debug!(skipped, "lexicon rows without an emotion category");
        Ok(lexicon)
    }
}

impl Lexicon for IntensityLexicon {
    fn intensity(&self, token: &str) -> Option<&EmotionMap<f64>> {
        self.entries.get(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn sums_intensities_and_ignores_unknown_tokens() {
        let lexicon = IntensityLexicon::from_entries([
            ("furious", Emotion::Anger, 0.9),
            ("thrilled", Emotion::Joy, 0.8),
            ("thrilled", Emotion::Surprise, 0.3),
        ]);
        let doc = tokens(&["i", "am", "thrilled", "not", "furious", "thrilled"]);
        let vector = lexicon.lookup(&doc);
        assert!((vector[Emotion::Joy] - 1.6).abs() < 1e-12);
        assert!((vector[Emotion::Anger] - 0.9).abs() < 1e-12);
        assert_eq!(vector[Emotion::Fear], 0.0);
        assert_eq!(lexicon.word_count(&doc), 3);
    }

    #[test]
    fn loads_file_with_header_and_foreign_categories() {
        let input = "word\temotion\temotion-intensity-score\n\
                     outraged\tanger\t0.964\n\
                     outraged\tdisgust\t0.5\n\
                     happy\tpositive\t1\n";
        let lexicon = IntensityLexicon::load_from(input.as_bytes()).unwrap();
        assert_eq!(lexicon.len(), 1);
        let scores = lexicon.intensity("outraged").unwrap();
        assert_eq!(scores[Emotion::Disgust], 0.5);
    }

    #[test]
    fn bad_score_is_an_error() {
        let input = "calm\ttrust\thigh\n";
        assert!(matches!(
            IntensityLexicon::load_from(input.as_bytes()),
            Err(DataError::LexiconScore { line: 1, .. })
        ));
    }
}
