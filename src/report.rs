//! Persist run results under the outputs directory.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::{
    emotion::Emotion,
    eval::{Averages, MetricsReport},
    importance::{IntensityMatrix, LabelImportance},
    pipeline::RunReport,
};

pub const METRICS_FILE: &str = "metrics.json";
pub const CLASSIFICATION_REPORT_FILE: &str = "classification_report.csv";
pub const IMPORTANCE_FILE: &str = "importance.json";

#[derive(Serialize)]
struct MetricsFile<'a> {
    variant: &'a str,
    train_documents: usize,
    test_documents: usize,
    vocabulary_size: usize,
    n_features: usize,
    metrics: &'a MetricsReport,
}

#[derive(Serialize)]
struct ImportanceFile<'a> {
    variant: &'a str,
    labels: Vec<&'a LabelImportance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intensity_matrix: Option<&'a IntensityMatrix>,
}

/// Write `metrics.json`, `classification_report.csv` and `importance.json`
/// into `<outputs_dir>/<variant>/`. Returns that directory.
pub fn write_run(report: &RunReport, outputs_dir: &Path) -> Result<PathBuf> {
    let dir = outputs_dir.join(report.variant.name());
    std::fs::create_dir_all(&dir).with_context(|| format!("create {dir:?}"))?;

    let metrics = MetricsFile {
        variant: report.variant.name(),
        train_documents: report.train_documents,
        test_documents: report.test_documents,
        vocabulary_size: report.vocabulary_size,
        n_features: report.n_features,
        metrics: &report.metrics,
    };
    write_json(&dir.join(METRICS_FILE), &metrics)?;
    write_classification_report(&dir.join(CLASSIFICATION_REPORT_FILE), &report.metrics)?;

    let importance = ImportanceFile {
        variant: report.variant.name(),
        labels: report.importances.values().iter().collect(),
        intensity_matrix: report.intensity_matrix.as_ref(),
    };
    write_json(&dir.join(IMPORTANCE_FILE), &importance)?;

    info!(path = %dir.display(), variant = %report.variant, "wrote run reports");
    Ok(dir)
}

/// Pretty-printed JSON of any serializable value.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).with_context(|| format!("create {path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("write {path:?}"))?;
    Ok(())
}

/// Tabular classification report: one row per emotion, then the averages.
pub fn write_classification_report(path: &Path, metrics: &MetricsReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("create {path:?}"))?;
    writer.write_record(["label", "precision", "recall", "f1", "support", "auc"])?;
    for emotion in Emotion::ALL {
        let row = &metrics.per_label[emotion];
        writer.write_record([
            emotion.name().to_string(),
            fmt_score(row.precision),
            fmt_score(row.recall),
            fmt_score(row.f1),
            row.support.to_string(),
            row.auc.map(fmt_score).unwrap_or_default(),
        ])?;
    }
    for (name, averages) in [
        ("micro avg", &metrics.micro),
        ("macro avg", &metrics.macro_avg),
        ("weighted avg", &metrics.weighted),
        ("samples avg", &metrics.samples),
    ] {
        writer.write_record(average_row(name, averages))?;
    }
    writer.flush()?;
    Ok(())
}

fn average_row(name: &str, averages: &Averages) -> [String; 6] {
    [
        name.to_string(),
        fmt_score(averages.precision),
        fmt_score(averages.recall),
        fmt_score(averages.f1),
        averages.support.to_string(),
        String::new(),
    ]
}

fn fmt_score(value: f64) -> String {
    format!("{value:.4}")
}
