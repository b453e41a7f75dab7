//! End-to-end run: featurize → train → evaluate → rank, for one feature
//! variant over a fixed train/test split.

use std::fmt;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    data::{Document, Split},
    emotion::EmotionMap,
    eval::{evaluate, MetricsReport},
    features::{FeatureBuilder, NgramRange},
    importance::{intensity_matrix, rank, ImportanceRanking, IntensityMatrix, LabelImportance},
    labels::{LabelBinarizer, LabelSet},
    model::{MultiLabelTrainer, TrainerConfig},
    text::{Lexicon, Tokenizer},
};

/// Which feature blocks the classifier sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// N-gram counts only.
    Lexical,
    /// N-gram counts followed by the eight lexicon intensity columns.
    LexiconAugmented,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Lexical => "lexical",
            Variant::LexiconAugmented => "lexicon-augmented",
        }
    }

    pub fn uses_lexicon(self) -> bool {
        matches!(self, Variant::LexiconAugmented)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub ngram_range: NgramRange,
    pub trainer: TrainerConfig,
    /// Lexical features kept per label in the importance report.
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ngram_range: NgramRange::default(),
            trainer: TrainerConfig::default(),
            top_k: 10,
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub variant: Variant,
    pub train_documents: usize,
    pub test_documents: usize,
    pub vocabulary_size: usize,
    pub n_features: usize,
    pub metrics: MetricsReport,
    pub importances: EmotionMap<LabelImportance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity_matrix: Option<IntensityMatrix>,
}

fn texts(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|doc| doc.text.as_str()).collect()
}

fn label_sets(docs: &[Document]) -> Vec<LabelSet> {
    docs.iter().map(|doc| doc.labels.clone()).collect()
}

/// Train on `split.train` and score on `split.test`. The vocabulary and the
/// label support are learned from the training documents only.
#[instrument(
    skip_all,
    fields(variant = %variant, train = split.train.len(), test = split.test.len())
)]
pub fn run(
    split: &Split,
    variant: Variant,
    tokenizer: &dyn Tokenizer,
    lexicon: Option<&dyn Lexicon>,
    config: &PipelineConfig,
) -> Result<RunReport> {
    let lexicon = if variant.uses_lexicon() {
        Some(lexicon.context("the lexicon-augmented variant needs an intensity lexicon")?)
    } else {
        None
    };

    let builder = FeatureBuilder::new(config.ngram_range);
    let train_texts = texts(&split.train);
    let test_texts = texts(&split.test);
    let vocabulary = builder
        .fit_texts(&train_texts, tokenizer)
        .context("fitting vocabulary")?;
    info!(terms = vocabulary.len(), "vocabulary fitted");

    let x_train = builder
        .featurize(&train_texts, &vocabulary, tokenizer, lexicon)
        .context("featurizing training split")?;
    let x_test = builder
        .featurize(&test_texts, &vocabulary, tokenizer, lexicon)
        .context("featurizing test split")?;

    let mut binarizer = LabelBinarizer::new();
    let y_train = binarizer.fit_transform(&label_sets(&split.train));
    let y_test = binarizer.transform(&label_sets(&split.test));

    let model = MultiLabelTrainer::new(config.trainer)
        .train(&x_train, &y_train)
        .context("training separators")?;
    let (predicted, scores) = model
        .predict_with_scores(&x_test)
        .context("scoring test split")?;
    let metrics = evaluate(&y_test, &predicted, Some(&scores)).context("evaluating")?;
    info!(
        sample_f1 = metrics.sample_f1,
        micro_f1 = metrics.micro.f1,
        "evaluated test split"
    );

    let names = x_train.feature_names();
    let rankings = model
        .separators()
        .iter()
        .map(|(_, separator)| rank(separator, &names))
        .collect::<Result<Vec<ImportanceRanking>, _>>()
        .context("ranking features")?;
    let importances = EmotionMap::from_fn(|emotion| {
        LabelImportance::new(
            model.separator(emotion),
            &rankings[emotion.index()],
            config.top_k,
        )
    });

    Ok(RunReport {
        variant,
        train_documents: split.train.len(),
        test_documents: split.test.len(),
        vocabulary_size: vocabulary.len(),
        n_features: x_train.n_cols(),
        metrics,
        importances,
        intensity_matrix: intensity_matrix(&rankings),
    })
}

/// Both variants over the same split, lexical first.
pub fn compare(
    split: &Split,
    tokenizer: &dyn Tokenizer,
    lexicon: &dyn Lexicon,
    config: &PipelineConfig,
) -> Result<[RunReport; 2]> {
    let lexical = run(split, Variant::Lexical, tokenizer, None, config)?;
    let augmented = run(
        split,
        Variant::LexiconAugmented,
        tokenizer,
        Some(lexicon),
        config,
    )?;
    info!(
        lexical_f1 = lexical.metrics.sample_f1,
        augmented_f1 = augmented.metrics.sample_f1,
        "compared variants"
    );
    Ok([lexical, augmented])
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
            ("thrilled", Emotion::Joy, 0.8),
            ("surprised", Emotion::Surprise, 0.7),
        ])
    }

    fn train_on_itself(docs: Vec<Document>) -> Split {
        Split {
            train: docs.clone(),
            test: docs,
        }
    }

    #[test]
    fn toy_corpus_is_fitted_perfectly() {
        let split = train_on_itself(vec![
            doc("I am furious", "1"),
            doc("I am thrilled and surprised", "5,7"),
        ]);
        let lexicon = lexicon();
        let report = run(
            &split,
            Variant::LexiconAugmented,
            &BasicTokenizer::default(),
            Some(&lexicon),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(report.metrics.sample_f1, 1.0);
        assert_eq!(report.n_features, report.vocabulary_size + 8);
        let matrix = report.intensity_matrix.unwrap();
        assert!(matrix.get(Emotion::Anger, Emotion::Anger) > 0.0);
        assert!(report.importances[Emotion::Anger].top_lexical.len() <= 10);
    }

    #[test]
    fn lexical_variant_has_no_intensity_view() {
        let split = train_on_itself(vec![doc("so angry now", "1"), doc("very happy now", "5")]);
        let report = run(
            &split,
            Variant::Lexical,
            &BasicTokenizer::default(),
            None,
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(report.n_features, report.vocabulary_size);
        assert!(report.intensity_matrix.is_none());
        assert!(report.importances[Emotion::Joy].intensity.is_none());
    }

    #[test]
    fn augmented_variant_requires_a_lexicon() {
        let split = train_on_itself(vec![doc("so angry", "1")]);
        let result = run(
            &split,
            Variant::LexiconAugmented,
            &BasicTokenizer::default(),
            None,
            &PipelineConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn compare_runs_both_variants() {
        let split = train_on_itself(vec![
            doc("I am furious", "1"),
            doc("I am thrilled and surprised", "5,7"),
        ]);
        let [lexical, augmented] = compare(
            &split,
            &BasicTokenizer::default(),
            &lexicon(),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(lexical.variant, Variant::Lexical);
        assert_eq!(augmented.variant, Variant::LexiconAugmented);
        assert_eq!(lexical.vocabulary_size, augmented.vocabulary_size);
    }
}
