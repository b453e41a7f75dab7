//! Label parsing and multi-hot encoding over the eight emotions.

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    emotion::{Emotion, EmotionMap, EMOTION_COUNT},
    error::{FeatureError, LabelError},
};

/// Non-empty set of emotions attached to a document.
///
/// Keeps the order ids were listed in, without duplicates, so the first listed
/// emotion can drive stratified splitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet(Vec<Emotion>);

impl LabelSet {
    pub fn new(emotions: impl IntoIterator<Item = Emotion>) -> Result<Self, LabelError> {
        let mut ordered = Vec::new();
        for emotion in emotions {
            if !ordered.contains(&emotion) {
                ordered.push(emotion);
            }
        }
        if ordered.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(Self(ordered))
    }

    /// The first listed emotion.
    pub fn primary(&self) -> Emotion {
        self.0[0]
    }

    pub fn contains(&self, emotion: Emotion) -> bool {
        self.0.contains(&emotion)
    }

    pub fn iter(&self) -> impl Iterator<Item = Emotion> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse a label field such as `"1, 5,7"` into a [`LabelSet`].
pub fn parse_label_set(field: &str) -> Result<LabelSet, LabelError> {
    let compact: String = field.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(LabelError::Empty);
    }
    let emotions = compact
        .split(',')
        .map(|item| {
            let id: i64 = item
                .parse()
                .map_err(|_| LabelError::NotAnInteger(item.to_string()))?;
            u8::try_from(id)
                .ok()
                .and_then(Emotion::from_id)
                .ok_or(LabelError::OutOfRange(id))
        })
        .collect::<Result<Vec<_>, _>>()?;
    LabelSet::new(emotions)
}

/// Document × emotion indicator matrix with values in {0, 1}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatrix(Array2<u8>);

impl LabelMatrix {
    /// Wrap a raw indicator array with one column per emotion. Values other
    /// than 0 are treated as 1.
    pub fn from_array(mut indicators: Array2<u8>) -> Result<Self, FeatureError> {
        if indicators.ncols() != EMOTION_COUNT {
            return Err(FeatureError::alignment(
                "label columns",
                EMOTION_COUNT,
                indicators.ncols(),
            ));
        }
        indicators.mapv_inplace(|value| u8::from(value != 0));
        Ok(Self(indicators))
    }

    pub fn n_rows(&self) -> usize {
        self.0.nrows()
    }

    pub fn column(&self, emotion: Emotion) -> ArrayView1<'_, u8> {
        self.0.column(emotion.index())
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, u8> {
        self.0.row(row)
    }

    pub fn get(&self, row: usize, emotion: Emotion) -> bool {
        self.0[[row, emotion.index()]] == 1
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.0
    }

    /// Emotions switched on in `row`, in column order.
    pub fn emotions_in_row(&self, row: usize) -> Vec<Emotion> {
        Emotion::ALL
            .into_iter()
            .filter(|emotion| self.get(row, *emotion))
            .collect()
    }
}

/// Multi-hot encoder over the fixed emotion universe.
///
/// The universe is always all eight emotions, so `transform` never drops or
/// adds columns; `fit` only records how often each emotion occurs in training.
#[derive(Debug, Clone, Default)]
pub struct LabelBinarizer {
    support: Option<EmotionMap<usize>>,
}

impl LabelBinarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record training support and encode the training labels.
    pub fn fit_transform(&mut self, labels: &[LabelSet]) -> LabelMatrix {
        let mut support = EmotionMap::<usize>::default();
        for set in labels {
            for emotion in set.iter() {
                support[emotion] += 1;
            }
        }
        for (emotion, count) in support.iter() {
            if *count == 0 {
                warn!(%emotion, "emotion never occurs in the training labels");
            }
        }
        debug!(?support, "fitted label binarizer");
        self.support = Some(support);
        self.transform(labels)
    }

    /// Encode labels against the eight-emotion universe.
    pub fn transform(&self, labels: &[LabelSet]) -> LabelMatrix {
        let mut indicators = Array2::<u8>::zeros((labels.len(), EMOTION_COUNT));
        for (row, set) in labels.iter().enumerate() {
            for emotion in set.iter() {
                indicators[[row, emotion.index()]] = 1;
            }
        }
        LabelMatrix(indicators)
    }

    /// Per-emotion training counts, once fitted.
    pub fn support(&self) -> Option<&EmotionMap<usize>> {
        self.support.as_ref()
    }

    /// Emotions in the fixed column order.
    pub fn classes(&self) -> [Emotion; EMOTION_COUNT] {
        Emotion::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_insensitive_lists() {
        let set = parse_label_set(" 5 , 7").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Emotion::Joy, Emotion::Surprise]);
        assert_eq!(set.primary(), Emotion::Joy);
    }

    #[test]
    fn duplicate_ids_collapse() {
        let set = parse_label_set("2,2,1").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.primary(), Emotion::Anticipation);
    }

    #[test]
    fn rejects_bad_fields() {
        assert_eq!(parse_label_set("").unwrap_err(), LabelError::Empty);
        assert_eq!(parse_label_set("  ").unwrap_err(), LabelError::Empty);
        assert_eq!(parse_label_set("9").unwrap_err(), LabelError::OutOfRange(9));
        assert_eq!(parse_label_set("0").unwrap_err(), LabelError::OutOfRange(0));
        assert_eq!(parse_label_set("-1").unwrap_err(), LabelError::OutOfRange(-1));
        assert_eq!(
            parse_label_set("1,,2").unwrap_err(),
            LabelError::NotAnInteger(String::new())
        );
        assert_eq!(
            parse_label_set("joy").unwrap_err(),
            LabelError::NotAnInteger("joy".into())
        );
    }

    #[test]
    fn one_two_encodes_first_two_columns() {
        let mut binarizer = LabelBinarizer::new();
        let matrix = binarizer.fit_transform(&[parse_label_set("1,2").unwrap()]);
        assert_eq!(matrix.row(0).to_vec(), vec![1, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn transform_keeps_all_eight_columns_for_unseen_emotions() {
        let mut binarizer = LabelBinarizer::new();
        binarizer.fit_transform(&[parse_label_set("1").unwrap()]);
        let test = binarizer.transform(&[parse_label_set("8").unwrap()]);
        assert_eq!(test.as_array().ncols(), EMOTION_COUNT);
        assert!(test.get(0, Emotion::Trust));
        assert_eq!(binarizer.support().unwrap()[Emotion::Trust], 0);
    }

    #[test]
    fn from_array_rejects_other_widths() {
        assert_eq!(
            LabelMatrix::from_array(Array2::zeros((2, 7))).unwrap_err(),
            FeatureError::alignment("label columns", EMOTION_COUNT, 7)
        );
        let matrix = LabelMatrix::from_array(ndarray::array![[0, 3, 0, 0, 0, 0, 0, 1]]).unwrap();
        assert_eq!(matrix.emotions_in_row(0), vec![Emotion::Anticipation, Emotion::Trust]);
    }
}
