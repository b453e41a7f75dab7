//! Typed failures raised where data enters the pipeline.
//!
//! The binary wraps these in `anyhow` with context; library callers can match
//! on them directly.

use thiserror::Error;

/// A label field could not be turned into a non-empty set of emotion ids.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    #[error("label field is empty")]
    Empty,
    #[error("label id `{0}` is not an integer")]
    NotAnInteger(String),
    #[error("label id {0} is outside 1..=8")]
    OutOfRange(i64),
}

/// Problems building or combining feature blocks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    /// Row-count or column-count disagreement between blocks that must line up.
    #[error("feature alignment: {what} has {found}, expected {expected}")]
    Alignment {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("intensity block must have 8 columns, got {0}")]
    IntensityWidth(usize),
    #[error("invalid n-gram range {min}..={max}")]
    NgramRange { min: usize, max: usize },
    #[error("vocabulary is empty; the training corpus produced no terms")]
    EmptyVocabulary,
}

impl FeatureError {
    pub fn alignment(what: &'static str, expected: usize, found: usize) -> Self {
        Self::Alignment {
            what,
            expected,
            found,
        }
    }
}

/// Training and prediction failures.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error("regularization strength must be positive, got {0}")]
    InvalidC(f64),
    #[error("cannot train on an empty feature matrix")]
    EmptyDataset,
    #[error("training task for {0} did not produce a separator")]
    MissingSeparator(&'static str),
    #[error(transparent)]
    Linfa(#[from] linfa::Error),
}

/// Dataset loading and splitting failures.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("line {line}: {source}")]
    Label {
        line: usize,
        #[source]
        source: LabelError,
    },
    #[error("line {line}: expected `text<TAB>label`")]
    MalformedRecord { line: usize },
    #[error("stratum `{stratum}` has {count} document(s); at least 2 are required to split")]
    TinyStratum { stratum: String, count: usize },
    #[error("test fraction must lie in (0, 1), got {0}")]
    TestFraction(f64),
    #[error("corpus of {total} document(s) cannot hold out {test} for testing")]
    SplitSize { total: usize, test: usize },
    #[error("lexicon line {line}: score `{value}` is not a number")]
    LexiconScore { line: usize, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
