//! The fixed eight-emotion label space shared by every pipeline stage.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};

/// Number of emotion categories. The label space never changes.
pub const EMOTION_COUNT: usize = 8;

/// One of the eight emotion categories, numbered 1..=8 in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Anger,
    Anticipation,
    Disgust,
    Fear,
    Joy,
    Sadness,
    Surprise,
    Trust,
}

impl Emotion {
    /// All emotions in column order.
    pub const ALL: [Emotion; EMOTION_COUNT] = [
        Emotion::Anger,
        Emotion::Anticipation,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Trust,
    ];

    /// Resolve a dataset id (1..=8).
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=8 => Some(Self::ALL[usize::from(id - 1)]),
            _ => None,
        }
    }

    /// Resolve a lower-case emotion name as used by intensity lexicons.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|emotion| emotion.name() == name)
    }

    /// Resolve an intensity feature column name such as `raw_joy`.
    pub fn from_intensity_column(name: &str) -> Option<Self> {
        name.strip_prefix(INTENSITY_PREFIX).and_then(Self::from_name)
    }

    /// Dataset id, 1-based.
    pub fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Zero-based column index in label and intensity blocks.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Anger => "anger",
            Emotion::Anticipation => "anticipation",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
            Emotion::Trust => "trust",
        }
    }

    /// Name of the dense intensity feature column for this emotion.
    pub fn intensity_column(self) -> &'static str {
        match self {
            Emotion::Anger => "raw_anger",
            Emotion::Anticipation => "raw_anticipation",
            Emotion::Disgust => "raw_disgust",
            Emotion::Fear => "raw_fear",
            Emotion::Joy => "raw_joy",
            Emotion::Sadness => "raw_sadness",
            Emotion::Surprise => "raw_surprise",
            Emotion::Trust => "raw_trust",
        }
    }
}

const INTENSITY_PREFIX: &str = "raw_";

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size table holding one value per emotion, indexed by [`Emotion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmotionMap<T>([T; EMOTION_COUNT]);

impl<T> EmotionMap<T> {
    pub fn new(values: [T; EMOTION_COUNT]) -> Self {
        Self(values)
    }

    /// Build a table by evaluating `f` for each emotion in column order.
    pub fn from_fn(mut f: impl FnMut(Emotion) -> T) -> Self {
        Self(std::array::from_fn(|idx| f(Emotion::ALL[idx])))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, &T)> {
        Emotion::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T; EMOTION_COUNT] {
        &self.0
    }

    pub fn map<U>(&self, mut f: impl FnMut(Emotion, &T) -> U) -> EmotionMap<U> {
        EmotionMap::from_fn(|emotion| f(emotion, &self.0[emotion.index()]))
    }

    pub fn into_inner(self) -> [T; EMOTION_COUNT] {
        self.0
    }
}

impl<T> Index<Emotion> for EmotionMap<T> {
    type Output = T;

    fn index(&self, emotion: Emotion) -> &T {
        &self.0[emotion.index()]
    }
}

impl<T> IndexMut<Emotion> for EmotionMap<T> {
    fn index_mut(&mut self, emotion: Emotion) -> &mut T {
        &mut self.0[emotion.index()]
    }
}

// Serialized as an object keyed by emotion name so reports stay readable.
impl<T: Serialize> Serialize for EmotionMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(EMOTION_COUNT))?;
        for (emotion, value) in self.iter() {
            map.serialize_entry(emotion.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_table() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_id(emotion.id()), Some(emotion));
        }
        assert_eq!(Emotion::from_id(0), None);
        assert_eq!(Emotion::from_id(9), None);
    }

    #[test]
    fn intensity_columns_resolve_by_name() {
        assert_eq!(Emotion::from_intensity_column("raw_trust"), Some(Emotion::Trust));
        assert_eq!(Emotion::from_intensity_column("trust"), None);
        assert_eq!(Emotion::from_intensity_column("raw_positive"), None);
    }

    #[test]
    fn emotion_map_serializes_by_name() {
        let map = EmotionMap::from_fn(|emotion| emotion.id());
        let json = serde_json::to_value(map).unwrap();
        assert_eq!(json["anger"], 1);
        assert_eq!(json["trust"], 8);
    }
}
