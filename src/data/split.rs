//! Stratified train/test holdout keyed on each document's first listed emotion.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use crate::{data::Document, emotion::Emotion, error::DataError};

/// Train and test partitions of one corpus.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<Document>,
    pub test: Vec<Document>,
}

/// Hold out `test_fraction` of `docs`, keeping the share of each primary
/// emotion comparable across the two partitions.
///
/// The test size is `ceil(test_fraction * n)`; it is spread across strata in
/// proportion to their size, with leftover slots going to the largest
/// fractional remainders.
pub fn stratified_split(
    docs: &[Document],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, DataError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::TestFraction(test_fraction));
    }
    let total = docs.len();
    let n_test = (test_fraction * total as f64).ceil() as usize;
    if n_test == 0 || n_test >= total {
        return Err(DataError::SplitSize {
            total,
            test: n_test,
        });
    }

    let mut strata: BTreeMap<Emotion, Vec<usize>> = BTreeMap::new();
    for (idx, doc) in docs.iter().enumerate() {
        strata.entry(doc.labels.primary()).or_default().push(idx);
    }
    if let Some((emotion, members)) = strata.iter().find(|(_, members)| members.len() < 2) {
        return Err(DataError::TinyStratum {
            stratum: emotion.to_string(),
            count: members.len(),
        });
    }

    let quotas = allocate(&strata, n_test, total);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut test_idx = Vec::with_capacity(n_test);
    let mut train_idx = Vec::with_capacity(total - n_test);
    for ((emotion, members), quota) in strata.iter().zip(quotas) {
        let mut shuffled = members.clone();
        shuffled.shuffle(&mut rng);
        let (held_out, kept) = shuffled.split_at(quota);
        debug!(%emotion, test = held_out.len(), train = kept.len(), "split stratum");
        test_idx.extend_from_slice(held_out);
        train_idx.extend_from_slice(kept);
    }
    test_idx.sort_unstable();
    train_idx.sort_unstable();

    info!(train = train_idx.len(), test = test_idx.len(), "stratified split");
    Ok(Split {
        train: train_idx.iter().map(|&idx| docs[idx].clone()).collect(),
        test: test_idx.iter().map(|&idx| docs[idx].clone()).collect(),
    })
}

fn allocate(strata: &BTreeMap<Emotion, Vec<usize>>, n_test: usize, total: usize) -> Vec<usize> {
    let exact: Vec<f64> = strata
        .values()
        .map(|members| n_test as f64 * members.len() as f64 / total as f64)
        .collect();
    let mut quotas: Vec<usize> = exact.iter().map(|value| value.floor() as usize).collect();
    let mut leftover = n_test - quotas.iter().sum::<usize>();

    let mut by_remainder: Vec<usize> = (0..exact.len()).collect();
    // Stable sort: equal remainders keep emotion order.
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra)
    });
    let sizes: Vec<usize> = strata.values().map(Vec::len).collect();
    for idx in by_remainder.into_iter().cycle().take(exact.len() * 2) {
        if leftover == 0 {
            break;
        }
        // Every stratum keeps at least one training document.
        if quotas[idx] + 1 < sizes[idx] {
            quotas[idx] += 1;
            leftover -= 1;
        }
    }
    quotas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::parse_label_set;

    fn corpus(spec: &[(&str, usize)]) -> Vec<Document> {
        spec.iter()
            .flat_map(|(label, count)| {
                (0..*count).map(move |idx| {
                    Document::new(format!("doc {label} {idx}"), parse_label_set(label).unwrap())
                })
            })
            .collect()
    }

    #[test]
    fn holds_out_ceil_of_fraction() {
        let docs = corpus(&[("1", 30), ("5,7", 15), ("8", 6)]);
        let split = stratified_split(&docs, 0.1, 42).unwrap();
        assert_eq!(split.test.len(), 6);
        assert_eq!(split.train.len(), 45);
    }

    #[test]
    fn keeps_strata_proportional() {
        let docs = corpus(&[("1", 50), ("5", 30), ("7,1", 20)]);
        let split = stratified_split(&docs, 0.1, 7).unwrap();
        let count = |emotion: Emotion| {
            split
                .test
                .iter()
                .filter(|doc| doc.labels.primary() == emotion)
                .count()
        };
        assert_eq!(count(Emotion::Anger), 5);
        assert_eq!(count(Emotion::Joy), 3);
        assert_eq!(count(Emotion::Surprise), 2);
    }

    #[test]
    fn same_seed_same_partition() {
        let docs = corpus(&[("1", 20), ("2", 20)]);
        let a = stratified_split(&docs, 0.1, 42).unwrap();
        let b = stratified_split(&docs, 0.1, 42).unwrap();
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn singleton_stratum_is_rejected() {
        let docs = corpus(&[("1", 10), ("3", 1)]);
        assert!(matches!(
            stratified_split(&docs, 0.1, 42),
            Err(DataError::TinyStratum { count: 1, .. })
        ));
    }
}
