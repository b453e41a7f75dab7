//! Feature importance read off trained separator weights.

use std::cmp::Ordering;

use serde::Serialize;

use crate::{
    emotion::{Emotion, EmotionMap, EMOTION_COUNT},
    error::FeatureError,
    model::Separator,
};

/// One weighted column of a separator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedFeature {
    pub name: String,
    pub weight: f64,
    /// Position of the column in the feature matrix.
    pub column: usize,
    /// Set for the `raw_<emotion>` intensity columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Emotion>,
}

/// Every column of one separator ordered by descending weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceRanking {
    pub emotion: Emotion,
    pub features: Vec<WeightedFeature>,
}

impl ImportanceRanking {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The `k` highest-weighted n-gram features, intensity columns excluded.
    pub fn top_lexical(&self, k: usize) -> Vec<&WeightedFeature> {
        self.features
            .iter()
            .filter(|feature| feature.intensity.is_none())
            .take(k)
            .collect()
    }

    /// Weights of the intensity columns, or `None` when the matrix had none.
    pub fn intensity_weights(&self) -> Option<EmotionMap<f64>> {
        let mut weights = EmotionMap::<f64>::default();
        let mut seen = 0;
        for feature in &self.features {
            if let Some(emotion) = feature.intensity {
                weights[emotion] = feature.weight;
                seen += 1;
            }
        }
        (seen == EMOTION_COUNT).then_some(weights)
    }
}

/// Pair each weight with its column name and sort by weight, highest first.
/// Equal weights keep their column order.
pub fn rank(
    separator: &Separator,
    feature_names: &[String],
) -> Result<ImportanceRanking, FeatureError> {
    let weights = separator.weights();
    if weights.len() != feature_names.len() {
        return Err(FeatureError::alignment(
            "feature names",
            weights.len(),
            feature_names.len(),
        ));
    }
    let mut features: Vec<WeightedFeature> = weights
        .iter()
        .zip(feature_names)
        .enumerate()
        .map(|(column, (&weight, name))| WeightedFeature {
            name: name.clone(),
            weight,
            column,
            intensity: Emotion::from_intensity_column(name),
        })
        .collect();
    // `sort_by` is stable, so ties (including -0.0 against 0.0) stay in
    // column order.
    features.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    Ok(ImportanceRanking {
        emotion: separator.emotion(),
        features,
    })
}

/// Weight of each raw intensity feature (columns) in each label's separator
/// (rows).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityMatrix {
    pub rows: EmotionMap<EmotionMap<f64>>,
}

impl IntensityMatrix {
    pub fn get(&self, predicted: Emotion, feature: Emotion) -> f64 {
        self.rows[predicted][feature]
    }
}

/// Assemble the 8×8 intensity view from one ranking per label. `None` when
/// the rankings come from a lexical-only matrix, or unless every emotion has
/// exactly one ranking.
pub fn intensity_matrix(rankings: &[ImportanceRanking]) -> Option<IntensityMatrix> {
    let mut rows = EmotionMap::<EmotionMap<f64>>::default();
    let mut seen = EmotionMap::<bool>::default();
    for ranking in rankings {
        if std::mem::replace(&mut seen[ranking.emotion], true) {
            return None;
        }
        rows[ranking.emotion] = ranking.intensity_weights()?;
    }
    seen.values()
        .iter()
        .all(|&covered| covered)
        .then_some(IntensityMatrix { rows })
}

/// What the report writer keeps per label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelImportance {
    pub emotion: Emotion,
    pub intercept: f64,
    pub top_lexical: Vec<WeightedFeature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<EmotionMap<f64>>,
}

impl LabelImportance {
    pub fn new(separator: &Separator, ranking: &ImportanceRanking, top_k: usize) -> Self {
        Self {
            emotion: ranking.emotion,
            intercept: separator.intercept(),
            top_lexical: ranking.top_lexical(top_k).into_iter().cloned().collect(),
            intensity: ranking.intensity_weights(),
        }
    }
}
