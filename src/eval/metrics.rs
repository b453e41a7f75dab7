//! Per-label and averaged multi-label classification metrics.

use ndarray::Array2;
use serde::Serialize;

use crate::{
    emotion::{Emotion, EmotionMap, EMOTION_COUNT},
    error::FeatureError,
    eval::auc::roc_auc,
    labels::LabelMatrix,
};

/// Confusion counts and derived scores for one emotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
    /// `None` when the split holds only one class for this emotion.
    pub auc: Option<f64>,
}

/// One averaged row of the classification report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub per_label: EmotionMap<LabelMetrics>,
    pub micro: Averages,
    #[serde(rename = "macro")]
    pub macro_avg: Averages,
    pub weighted: Averages,
    pub samples: Averages,
    /// Mean of per-document F1 over all eight labels.
    pub sample_f1: f64,
}

impl MetricsReport {
    pub fn auc(&self) -> EmotionMap<Option<f64>> {
        self.per_label.map(|_, metrics| metrics.auc)
    }
}

/// `num / den`, or 0.0 when the denominator is zero.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn scores(tp: usize, fp: usize, fn_: usize) -> (f64, f64, f64) {
    (
        ratio(tp, tp + fp),
        ratio(tp, tp + fn_),
        ratio(2 * tp, 2 * tp + fp + fn_),
    )
}

/// Score `predicted` against `truth`. AUC uses the raw decision `scores`
/// when given; without them every label's AUC is `None`.
pub fn evaluate(
    truth: &LabelMatrix,
    predicted: &LabelMatrix,
    decision_scores: Option<&Array2<f64>>,
) -> Result<MetricsReport, FeatureError> {
    let n = truth.n_rows();
    if predicted.n_rows() != n {
        return Err(FeatureError::alignment("predicted rows", n, predicted.n_rows()));
    }
    if let Some(matrix) = decision_scores {
        if matrix.nrows() != n {
            return Err(FeatureError::alignment("score rows", n, matrix.nrows()));
        }
        if matrix.ncols() != EMOTION_COUNT {
            return Err(FeatureError::alignment(
                "score columns",
                EMOTION_COUNT,
                matrix.ncols(),
            ));
        }
    }

    let per_label = EmotionMap::from_fn(|emotion| {
        label_metrics(truth, predicted, emotion, decision_scores)
    });

    let (mut tp, mut fp, mut fn_) = (0, 0, 0);
    let mut total_support = 0;
    let (mut macro_p, mut macro_r, mut macro_f) = (0.0, 0.0, 0.0);
    let (mut weighted_p, mut weighted_r, mut weighted_f) = (0.0, 0.0, 0.0);
    for (_, metrics) in per_label.iter() {
        tp += metrics.true_positives;
        fp += metrics.false_positives;
        fn_ += metrics.false_negatives;
        total_support += metrics.support;
        macro_p += metrics.precision;
        macro_r += metrics.recall;
        macro_f += metrics.f1;
        let weight = metrics.support as f64;
        weighted_p += weight * metrics.precision;
        weighted_r += weight * metrics.recall;
        weighted_f += weight * metrics.f1;
    }

    let (micro_p, micro_r, micro_f) = scores(tp, fp, fn_);
    let labels = EMOTION_COUNT as f64;
    let support_weight = if total_support == 0 {
        0.0
    } else {
        1.0 / total_support as f64
    };
    let samples = sample_averages(truth, predicted, total_support);

    Ok(MetricsReport {
        per_label,
        micro: Averages {
            precision: micro_p,
            recall: micro_r,
            f1: micro_f,
            support: total_support,
        },
        macro_avg: Averages {
            precision: macro_p / labels,
            recall: macro_r / labels,
            f1: macro_f / labels,
            support: total_support,
        },
        weighted: Averages {
            precision: weighted_p * support_weight,
            recall: weighted_r * support_weight,
            f1: weighted_f * support_weight,
            support: total_support,
        },
        sample_f1: samples.f1,
        samples,
    })
}

fn label_metrics(
    truth: &LabelMatrix,
    predicted: &LabelMatrix,
    emotion: Emotion,
    decision_scores: Option<&Array2<f64>>,
) -> LabelMetrics {
    let (mut tp, mut fp, mut fn_, mut tn) = (0, 0, 0, 0);
    for (&t, &p) in truth.column(emotion).iter().zip(predicted.column(emotion)) {
        match (t == 1, p == 1) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => tn += 1,
        }
    }
    let (precision, recall, f1) = scores(tp, fp, fn_);
    LabelMetrics {
        precision,
        recall,
        f1,
        support: tp + fn_,
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        true_negatives: tn,
        auc: decision_scores
            .and_then(|matrix| roc_auc(matrix.column(emotion.index()), truth.column(emotion))),
    }
}

/// Per-document precision/recall/F1 averaged over documents.
fn sample_averages(truth: &LabelMatrix, predicted: &LabelMatrix, support: usize) -> Averages {
    let n = truth.n_rows();
    if n == 0 {
        return Averages {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            support,
        };
    }
    let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);
    for row in 0..n {
        let t = truth.row(row);
        let p = predicted.row(row);
        let hits = t.iter().zip(p.iter()).filter(|&(a, b)| *a == 1 && *b == 1).count();
        let true_count = t.iter().filter(|&&v| v == 1).count();
        let pred_count = p.iter().filter(|&&v| v == 1).count();
        precision += ratio(hits, pred_count);
        recall += ratio(hits, true_count);
        f1 += ratio(2 * hits, true_count + pred_count);
    }
    let n = n as f64;
    Averages {
        precision: precision / n,
        recall: recall / n,
        f1: f1 / n,
        support,
    }
}
