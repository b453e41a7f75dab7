//! Multi-label emotion classification over short texts.
//!
//! Documents are featurized as n-gram counts, optionally followed by eight
//! lexicon-derived emotion intensities, and scored by one linear separator per
//! emotion. See [`pipeline::run`] for the end-to-end flow.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod emotion;
pub mod error;
pub mod eval;
pub mod features;
pub mod importance;
pub mod labels;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod text;

pub use emotion::{Emotion, EmotionMap, EMOTION_COUNT};
