//! Tab-separated corpus reader.

use std::{io::Read, path::Path};

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::DataError,
    labels::{parse_label_set, LabelSet},
};

/// A labelled short text. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub labels: LabelSet,
}

impl Document {
    pub fn new(text: impl Into<String>, labels: LabelSet) -> Self {
        Self {
            text: text.into(),
            labels,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    text: String,
    label: String,
}

/// Load `text<TAB>label` records (no header) from `path`.
pub fn read_corpus(path: &Path) -> Result<Vec<Document>, DataError> {
    let file = std::fs::File::open(path)?;
    let docs = read_corpus_from(file)?;
    info!(path = %path.display(), documents = docs.len(), "loaded corpus");
    Ok(docs)
}

/// Same as [`read_corpus`] over any reader. Labels are validated here so a bad
/// row aborts loading instead of surfacing during training.
pub fn read_corpus_from<R: Read>(reader: R) -> Result<Vec<Document>, DataError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut docs = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = record?;
        if record.len() != 2 {
            return Err(DataError::MalformedRecord { line });
        }
        let raw: RawRecord = record.deserialize(None)?;
        let labels =
            parse_label_set(&raw.label).map_err(|source| DataError::Label { line, source })?;
        docs.push(Document::new(raw.text, labels));
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;

    #[test]
    fn reads_tab_separated_records() {
        let input = "I am furious\t1\nWhat a lovely surprise\t5, 7\n";
        let docs = read_corpus_from(input.as_bytes()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].text, "What a lovely surprise");
        assert!(docs[1].labels.contains(Emotion::Surprise));
    }

    #[test]
    fn invalid_label_reports_line() {
        let input = "fine\t1\nbroken\t12\n";
        match read_corpus_from(input.as_bytes()) {
            Err(DataError::Label { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_label_column_is_malformed() {
        let input = "no label here\n";
        assert!(matches!(
            read_corpus_from(input.as_bytes()),
            Err(DataError::MalformedRecord { line: 1 })
        ));
    }
}
