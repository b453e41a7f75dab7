//! Fused document × feature matrix: sparse n-gram counts followed by an
//! optional dense block of eight emotion-intensity columns.

use linfa::dataset::Records;
use ndarray::Array2;
use serde::Serialize;
use sprs::{CsMat, TriMat};

use crate::{
    emotion::{Emotion, EMOTION_COUNT},
    error::FeatureError,
    features::vocabulary::Vocabulary,
};

/// Where a column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "emotion", rename_all = "snake_case")]
pub enum ColumnKind {
    Lexical,
    Intensity(Emotion),
}

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    vocabulary: Vocabulary,
    lexical: CsMat<f64>,
    intensity: Option<Array2<f64>>,
}

impl FeatureMatrix {
    /// Build the lexical block from per-document `(column, count)` entries.
    pub(crate) fn from_counts(vocabulary: Vocabulary, rows: &[Vec<(usize, f64)>]) -> Self {
        let mut triplets = TriMat::new((rows.len(), vocabulary.len()));
        for (row, entries) in rows.iter().enumerate() {
            for &(col, value) in entries {
                triplets.add_triplet(row, col, value);
            }
        }
        let lexical: CsMat<f64> = triplets.to_csr();
        Self {
            vocabulary,
            lexical,
            intensity: None,
        }
    }

    /// Append the eight intensity columns. Rows are matched by index, so the
    /// block must have exactly one row per document.
    pub fn with_intensity(mut self, block: Array2<f64>) -> Result<Self, FeatureError> {
        if block.nrows() != self.n_rows() {
            return Err(FeatureError::alignment(
                "intensity rows",
                self.n_rows(),
                block.nrows(),
            ));
        }
        if block.ncols() != EMOTION_COUNT {
            return Err(FeatureError::IntensityWidth(block.ncols()));
        }
        self.intensity = Some(block);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.lexical.rows()
    }

    pub fn n_cols(&self) -> usize {
        self.n_lexical() + self.intensity.as_ref().map_or(0, |_| EMOTION_COUNT)
    }

    pub fn n_lexical(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn has_intensity(&self) -> bool {
        self.intensity.is_some()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn lexical(&self) -> &CsMat<f64> {
        &self.lexical
    }

    pub fn intensity(&self) -> Option<&Array2<f64>> {
        self.intensity.as_ref()
    }

    pub fn column_kind(&self, col: usize) -> Option<ColumnKind> {
        let lexical = self.n_lexical();
        if col < lexical {
            Some(ColumnKind::Lexical)
        } else if self.has_intensity() && col < lexical + EMOTION_COUNT {
            Some(ColumnKind::Intensity(Emotion::ALL[col - lexical]))
        } else {
            None
        }
    }

    /// Column index of `raw_<emotion>`, if the intensity block is present.
    pub fn intensity_column(&self, emotion: Emotion) -> Option<usize> {
        self.has_intensity()
            .then(|| self.n_lexical() + emotion.index())
    }

    /// Column names in column order: vocabulary terms then `raw_<emotion>`.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vocabulary.terms().map(str::to_string).collect();
        if self.has_intensity() {
            names.extend(
                Emotion::ALL
                    .iter()
                    .map(|emotion| emotion.intensity_column().to_string()),
            );
        }
        names
    }

    /// Visit the non-zero lexical entries of `row`, then every intensity value.
    pub fn for_each_in_row(&self, row: usize, mut f: impl FnMut(usize, f64)) {
        if let Some(view) = self.lexical.outer_view(row) {
            for (col, &value) in view.iter() {
                f(col, value);
            }
        }
        if let Some(block) = &self.intensity {
            let offset = self.n_lexical();
            for (idx, &value) in block.row(row).iter().enumerate() {
                f(offset + idx, value);
            }
        }
    }

    /// `⟨x_row, weights⟩` over the feature columns.
    pub fn row_dot(&self, row: usize, weights: &[f64]) -> f64 {
        let mut sum = 0.0;
        self.for_each_in_row(row, |col, value| sum += value * weights[col]);
        sum
    }

    /// `weights += scale · x_row`.
    pub fn row_axpy(&self, row: usize, scale: f64, weights: &mut [f64]) {
        self.for_each_in_row(row, |col, value| weights[col] += scale * value);
    }

    pub fn row_sq_norm(&self, row: usize) -> f64 {
        let mut sum = 0.0;
        self.for_each_in_row(row, |_, value| sum += value * value);
        sum
    }

    /// Dense copy, mainly for inspection and tests on small corpora.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows(), self.n_cols()));
        for row in 0..self.n_rows() {
            self.for_each_in_row(row, |col, value| dense[[row, col]] = value);
        }
        dense
    }
}

impl Records for FeatureMatrix {
    type Elem = f64;

    fn nsamples(&self) -> usize {
        self.n_rows()
    }

    fn nfeatures(&self) -> usize {
        self.n_cols()
    }
}
