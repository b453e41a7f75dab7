//! Corpus-level statistics about how the intensity lexicon covers each label.

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    data::Document,
    emotion::EmotionMap,
    features::builder::tokenize_all,
    text::{Lexicon, TokenMode, Tokenizer},
};

/// How many documents contain at least one lexicon word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    /// Percentage of the documents carrying each label that hit the lexicon.
    pub per_label: EmotionMap<f64>,
    /// Documents carrying each label.
    pub label_totals: EmotionMap<usize>,
    /// Percentage over the whole corpus.
    pub overall: f64,
    pub documents: usize,
}

fn percent(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 * 100.0 / total as f64
    }
}

#[instrument(skip_all, fields(documents = docs.len()))]
pub fn emotion_word_coverage(
    docs: &[Document],
    tokenizer: &dyn Tokenizer,
    lexicon: &dyn Lexicon,
) -> CoverageReport {
    let texts: Vec<&str> = docs.iter().map(|doc| doc.text.as_str()).collect();
    let tokens = tokenize_all(&texts, tokenizer, TokenMode::Lemmatized);

    let mut hits = EmotionMap::<usize>::default();
    let mut totals = EmotionMap::<usize>::default();
    let mut covered = 0;
    for (doc, doc_tokens) in docs.iter().zip(&tokens) {
        let has_word = lexicon.word_count(doc_tokens) > 0;
        covered += usize::from(has_word);
        for emotion in doc.labels.iter() {
            totals[emotion] += 1;
            hits[emotion] += usize::from(has_word);
        }
    }

    let report = CoverageReport {
        per_label: hits.map(|emotion, &count| percent(count, totals[emotion])),
        label_totals: totals,
        overall: percent(covered, docs.len()),
        documents: docs.len(),
    };
    info!(overall = report.overall, "lexicon coverage");
    report
}

/// Average intensity vector of each label over the documents that contain
/// at least one lexicon word. Labels without such documents stay all-zero.
#[instrument(skip_all, fields(documents = docs.len()))]
pub fn mean_intensity_by_label(
    docs: &[Document],
    tokenizer: &dyn Tokenizer,
    lexicon: &dyn Lexicon,
) -> EmotionMap<EmotionMap<f64>> {
    let mut sums = EmotionMap::<EmotionMap<f64>>::default();
    let mut counts = EmotionMap::<usize>::default();
    for doc in docs {
        let tokens = tokenizer.tokenize_as(&doc.text, TokenMode::Lemmatized);
        if lexicon.word_count(&tokens) == 0 {
            continue;
        }
        let intensity = lexicon.lookup(&tokens);
        for label in doc.labels.iter() {
            counts[label] += 1;
            for (emotion, score) in intensity.iter() {
                sums[label][emotion] += score;
            }
        }
    }
    sums.map(|label, row| {
        let n = counts[label];
        row.map(|_, &sum| if n == 0 { 0.0 } else { sum / n as f64 })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        emotion::Emotion,
        labels::parse_label_set,
        text::{BasicTokenizer, IntensityLexicon},
    };

    fn doc(text: &str, labels: &str) -> Document {
        Document::new(text, parse_label_set(labels).unwrap())
    }

    fn lexicon() -> IntensityLexicon {
        IntensityLexicon::from_entries([
            ("furious", Emotion::Anger, 0.9),
            ("happy", Emotion::Joy, 0.6),
            ("happy", Emotion::Trust, 0.2),
        ])
    }

    #[test]
    fn coverage_counts_each_label_of_a_document() {
        let docs = [
            doc("I am furious", "1"),
            doc("nothing to see", "1"),
            doc("so happy today", "5,8"),
        ];
        let report = emotion_word_coverage(&docs, &BasicTokenizer::default(), &lexicon());
        assert_eq!(report.per_label[Emotion::Anger], 50.0);
        assert_eq!(report.per_label[Emotion::Joy], 100.0);
        assert_eq!(report.per_label[Emotion::Trust], 100.0);
        assert_eq!(report.per_label[Emotion::Fear], 0.0);
        assert_eq!(report.label_totals[Emotion::Anger], 2);
        assert!((report.overall - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn mean_intensity_skips_documents_without_emotion_words() {
        let docs = [
            doc("happy happy", "5"),
            doc("happy", "5"),
            doc("plain words", "5"),
        ];
        let means = mean_intensity_by_label(&docs, &BasicTokenizer::default(), &lexicon());
        assert!((means[Emotion::Joy][Emotion::Joy] - 0.9).abs() < 1e-9);
        assert!((means[Emotion::Joy][Emotion::Trust] - 0.3).abs() < 1e-9);
        assert!(means[Emotion::Fear].values().iter().all(|&v| v == 0.0));
    }
}
