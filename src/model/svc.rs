//! Binary linear SVM (squared hinge loss, L2 penalty) solved by dual
//! coordinate descent.
//!
//! The intercept is learned as the weight of an implicit constant feature of
//! value 1 and is therefore regularized together with the feature weights.

use ndarray::ArrayView1;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{emotion::Emotion, error::ModelError, features::FeatureMatrix};

/// Projected gradients below this are treated as zero.
const PG_EPSILON: f64 = 1e-12;

/// Solver settings shared by every per-emotion fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainerConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Stopping tolerance on the projected-gradient spread.
    pub tol: f64,
    /// Maximum number of passes over the training rows.
    pub max_iter: usize,
    /// Seed of the coordinate permutation.
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            c: 0.01,
            tol: 1e-4,
            max_iter: 1000,
            seed: 42,
        }
    }
}

/// Learned linear decision function for one emotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Separator {
    emotion: Emotion,
    weights: Vec<f64>,
    intercept: f64,
    iterations: usize,
    converged: bool,
}

impl Separator {
    /// Separator that scores every row the same. Used when the training column
    /// holds a single class.
    pub(crate) fn constant(emotion: Emotion, n_features: usize, positive: bool) -> Self {
        Self::from_parts(
            emotion,
            vec![0.0; n_features],
            if positive { 1.0 } else { -1.0 },
        )
    }

    /// Rebuild a separator from known coefficients.
    pub fn from_parts(emotion: Emotion, weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            emotion,
            weights,
            intercept,
            iterations: 0,
            converged: true,
        }
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// One weight per feature column.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Signed distance-like score of `row`; positive means the emotion is present.
    pub fn decision(&self, x: &FeatureMatrix, row: usize) -> f64 {
        x.row_dot(row, &self.weights) + self.intercept
    }
}

/// Per-sample cost multipliers `(positive, negative)` under which each class
/// contributes half of the total cost: `n / (2 · n_class)`.
fn balanced_weights(n_pos: usize, n_neg: usize) -> (f64, f64) {
    let n = (n_pos + n_neg) as f64;
    (n / (2.0 * n_pos as f64), n / (2.0 * n_neg as f64))
}

/// Fit one emotion column against all other rows with balanced class weights.
pub fn fit_binary(
    x: &FeatureMatrix,
    y: ArrayView1<'_, u8>,
    emotion: Emotion,
    config: &TrainerConfig,
) -> Result<Separator, ModelError> {
    if !(config.c > 0.0) {
        return Err(ModelError::InvalidC(config.c));
    }
    let n = x.n_rows();
    if n == 0 {
        return Err(ModelError::EmptyDataset);
    }
    if y.len() != n {
        return Err(crate::error::FeatureError::alignment("label rows", n, y.len()).into());
    }
    let d = x.n_cols();

    let n_pos = y.iter().filter(|&&v| v == 1).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        debug!(%emotion, n_pos, "single-class column; using constant separator");
        return Ok(Separator::constant(emotion, d, n_neg == 0));
    }

    let (weight_pos, weight_neg) = balanced_weights(n_pos, n_neg);
    let sign: Vec<f64> = y.iter().map(|&v| if v == 1 { 1.0 } else { -1.0 }).collect();
    let diag: Vec<f64> = sign
        .iter()
        .map(|&s| {
            let cost = config.c * if s > 0.0 { weight_pos } else { weight_neg };
            0.5 / cost
        })
        .collect();
    let qd: Vec<f64> = (0..n)
        .map(|i| diag[i] + x.row_sq_norm(i) + 1.0)
        .collect();

    let mut alpha = vec![0.0; n];
    let mut weights = vec![0.0; d];
    let mut intercept = 0.0;
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        order.shuffle(&mut rng);
        let mut pg_max = f64::NEG_INFINITY;
        let mut pg_min = f64::INFINITY;
        for &i in &order {
            let gradient =
                sign[i] * (x.row_dot(i, &weights) + intercept) - 1.0 + diag[i] * alpha[i];
            let projected = if alpha[i] == 0.0 {
                gradient.min(0.0)
            } else {
                gradient
            };
            pg_max = pg_max.max(projected);
            pg_min = pg_min.min(projected);
            if projected.abs() > PG_EPSILON {
                let previous = alpha[i];
                alpha[i] = (previous - gradient / qd[i]).max(0.0);
                let step = (alpha[i] - previous) * sign[i];
                x.row_axpy(i, step, &mut weights);
                intercept += step;
            }
        }
        iterations += 1;
        if pg_max - pg_min <= config.tol {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(%emotion, iterations, "separator converged");
    } else {
        warn!(%emotion, iterations, "separator reached max_iter before converging");
    }
    Ok(Separator {
        emotion,
        weights,
        intercept,
        iterations,
        converged,
    })
}
