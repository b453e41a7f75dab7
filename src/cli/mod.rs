//! Command-line interface wiring for emolens.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::{
    config::Settings,
    data::{read_corpus, stratified_split, Document, Split},
    model::TrainerConfig,
    pipeline::PipelineConfig,
    text::IntensityLexicon,
};

pub mod analyze;
pub mod compare;
pub mod train;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Multi-label emotion classification", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Train(args) => train::run(args, settings),
            Commands::Compare(args) => compare::run(args, settings),
            Commands::Analyze(args) => analyze::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Train one feature variant and write its reports.
    Train(train::Args),
    /// Train both variants on the same split and compare them.
    Compare(compare::Args),
    /// Report how the intensity lexicon covers each label.
    Analyze(analyze::Args),
}

/// Input overrides shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Annotated corpus; defaults to `EMOLENS_DATASET`.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
    /// Intensity lexicon; defaults to `EMOLENS_LEXICON`.
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
}

impl InputArgs {
    fn dataset<'a>(&'a self, settings: &'a Settings) -> &'a Path {
        self.dataset.as_deref().unwrap_or(&settings.dataset)
    }

    fn lexicon<'a>(&'a self, settings: &'a Settings) -> &'a Path {
        self.lexicon.as_deref().unwrap_or(&settings.lexicon)
    }

    pub(crate) fn load_corpus(&self, settings: &Settings) -> Result<Vec<Document>> {
        let path = self.dataset(settings);
        read_corpus(path).with_context(|| format!("loading corpus {}", path.display()))
    }

    pub(crate) fn load_split(&self, settings: &Settings) -> Result<Split> {
        let docs = self.load_corpus(settings)?;
        let split = stratified_split(&docs, settings.test_fraction, settings.seed)
            .context("splitting corpus")?;
        info!(
            train = split.train.len(),
            test = split.test.len(),
            "prepared split"
        );
        Ok(split)
    }

    pub(crate) fn load_lexicon(&self, settings: &Settings) -> Result<IntensityLexicon> {
        let path = self.lexicon(settings);
        IntensityLexicon::load(path).with_context(|| format!("loading lexicon {}", path.display()))
    }
}

pub(crate) fn pipeline_config(settings: &Settings, top_k: usize) -> PipelineConfig {
    PipelineConfig {
        trainer: TrainerConfig {
            seed: settings.seed,
            ..TrainerConfig::default()
        },
        top_k,
        ..PipelineConfig::default()
    }
}
