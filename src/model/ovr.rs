//! One-vs-rest training over the eight emotion columns.

use linfa::{dataset::DatasetBase, prelude::Fit};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    emotion::{Emotion, EmotionMap, EMOTION_COUNT},
    error::{FeatureError, ModelError},
    features::FeatureMatrix,
    labels::LabelMatrix,
    model::svc::{fit_binary, Separator, TrainerConfig},
};

/// Fits one independent separator per emotion.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiLabelTrainer {
    config: TrainerConfig,
}

impl MultiLabelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train all eight separators. Each emotion is fitted on its own rayon
    /// task against the shared read-only matrices; results land in a slot per
    /// emotion, so the outcome does not depend on scheduling.
    #[instrument(skip_all, fields(rows = x.n_rows(), cols = x.n_cols()))]
    pub fn train(&self, x: &FeatureMatrix, y: &LabelMatrix) -> Result<MultiLabelModel, ModelError> {
        if y.n_rows() != x.n_rows() {
            return Err(FeatureError::alignment("label rows", x.n_rows(), y.n_rows()).into());
        }
        let mut slots: Vec<Option<Result<Separator, ModelError>>> =
            (0..EMOTION_COUNT).map(|_| None).collect();
        slots.par_iter_mut().enumerate().for_each(|(idx, slot)| {
            let emotion = Emotion::ALL[idx];
            *slot = Some(fit_binary(x, y.column(emotion), emotion, &self.config));
        });

        let mut separators =
            EmotionMap::from_fn(|emotion| Separator::constant(emotion, 0, false));
        for (emotion, slot) in Emotion::ALL.into_iter().zip(slots) {
            separators[emotion] = slot.ok_or(ModelError::MissingSeparator(emotion.name()))??;
        }
        let unconverged = separators.iter().filter(|(_, s)| !s.converged()).count();
        info!(unconverged, "trained one-vs-rest separators");
        Ok(MultiLabelModel {
            separators,
            n_features: x.n_cols(),
        })
    }
}

impl Fit<FeatureMatrix, LabelMatrix, ModelError> for MultiLabelTrainer {
    type Object = MultiLabelModel;

    fn fit(
        &self,
        dataset: &DatasetBase<FeatureMatrix, LabelMatrix>,
    ) -> Result<Self::Object, ModelError> {
        self.train(&dataset.records, &dataset.targets)
    }
}

/// The eight trained separators. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLabelModel {
    separators: EmotionMap<Separator>,
    n_features: usize,
}

impl MultiLabelModel {
    pub fn separators(&self) -> &EmotionMap<Separator> {
        &self.separators
    }

    pub fn separator(&self, emotion: Emotion) -> &Separator {
        &self.separators[emotion]
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Raw scores, one column per emotion.
    pub fn decision_function(&self, x: &FeatureMatrix) -> Result<Array2<f64>, ModelError> {
        if x.n_cols() != self.n_features {
            return Err(
                FeatureError::alignment("feature columns", self.n_features, x.n_cols()).into(),
            );
        }
        let mut scores = Array2::zeros((x.n_rows(), EMOTION_COUNT));
        for (emotion, separator) in self.separators.iter() {
            for row in 0..x.n_rows() {
                scores[[row, emotion.index()]] = separator.decision(x, row);
            }
        }
        Ok(scores)
    }

    /// Threshold scores at zero. A row may come back with no emotion at all.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<LabelMatrix, ModelError> {
        self.predict_with_scores(x).map(|(labels, _)| labels)
    }

    /// Predictions together with the raw scores they were thresholded from.
    pub fn predict_with_scores(
        &self,
        x: &FeatureMatrix,
    ) -> Result<(LabelMatrix, Array2<f64>), ModelError> {
        let scores = self.decision_function(x)?;
        let labels = LabelMatrix::from_array(scores.mapv(|score| u8::from(score > 0.0)))?;
        Ok((labels, scores))
    }
}
