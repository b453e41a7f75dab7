//! Runtime configuration utilities for emolens.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for input corpora and lexicons.
    pub data_dir: PathBuf,
    /// Root folder for run reports.
    pub outputs_dir: PathBuf,
    /// Annotated `text<TAB>labels` corpus.
    pub dataset: PathBuf,
    /// `word<TAB>emotion<TAB>score` intensity lexicon.
    pub lexicon: PathBuf,
    /// Seed of the train/test split and of the solver's coordinate order.
    pub seed: u64,
    /// Share of the corpus held out for evaluation.
    pub test_fraction: f64,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let dataset = env::var("EMOLENS_DATASET")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("en-annotated.tsv"));
        let lexicon = env::var("EMOLENS_LEXICON")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("emotion-intensity-lexicon.txt"));
        let seed = match env::var("EMOLENS_SEED") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("EMOLENS_SEED `{raw}` is not an unsigned integer"))?,
            Err(_) => 42,
        };
        let test_fraction = match env::var("EMOLENS_TEST_FRACTION") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("EMOLENS_TEST_FRACTION `{raw}` is not a number"))?,
            Err(_) => 0.1,
        };
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            bail!("EMOLENS_TEST_FRACTION must lie in (0, 1), got {test_fraction}");
        }

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            data_dir,
            outputs_dir,
            dataset,
            lexicon,
            seed,
            test_fraction,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
