//! Rank-based ROC AUC.

use ndarray::ArrayView1;

/// Area under the ROC curve of `scores` against binary `truth`.
///
/// Computed as the Mann–Whitney statistic with average ranks for tied scores,
/// which equals the trapezoidal area under the ROC curve. Returns `None` when
/// `truth` holds a single class, where the curve is undefined.
pub fn roc_auc(scores: ArrayView1<'_, f64>, truth: ArrayView1<'_, u8>) -> Option<f64> {
    let n_pos = truth.iter().filter(|&&t| t == 1).count();
    let n_neg = truth.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // 1-based ranks start+1..=end share their mean.
        let mean_rank = (start + 1 + end) as f64 / 2.0;
        let positives = order[start..end]
            .iter()
            .filter(|&&idx| truth[idx] == 1)
            .count();
        positive_rank_sum += mean_rank * positives as f64;
        start = end;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Some((positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}
