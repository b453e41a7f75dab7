//! Evaluation of multi-label predictions.

pub mod auc;
pub mod metrics;

pub use auc::roc_auc;
pub use metrics::{evaluate, Averages, LabelMetrics, MetricsReport};
