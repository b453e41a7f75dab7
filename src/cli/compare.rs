//! CLI entry-point for comparing the lexical and lexicon-augmented variants.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    cli::{pipeline_config, InputArgs},
    config::Settings,
    emotion::EmotionMap,
    pipeline::{self, RunReport, Variant},
    report,
    text::BasicTokenizer,
};

/// Args for the `compare` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub inputs: InputArgs,
    /// Lexical features reported per label.
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,
}

#[derive(Debug, Serialize)]
struct VariantSummary {
    variant: Variant,
    n_features: usize,
    sample_f1: f64,
    micro_f1: f64,
    macro_f1: f64,
    auc: EmotionMap<Option<f64>>,
}

impl From<&RunReport> for VariantSummary {
    fn from(run: &RunReport) -> Self {
        Self {
            variant: run.variant,
            n_features: run.n_features,
            sample_f1: run.metrics.sample_f1,
            micro_f1: run.metrics.micro.f1,
            macro_f1: run.metrics.macro_avg.f1,
            auc: run.metrics.auc(),
        }
    }
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let split = args.inputs.load_split(&settings)?;
    let lexicon = args.inputs.load_lexicon(&settings)?;
    let tokenizer = BasicTokenizer::default();
    let config = pipeline_config(&settings, args.top_k);

    let runs = pipeline::compare(&split, &tokenizer, &lexicon, &config)?;
    for run in &runs {
        report::write_run(run, &settings.outputs_dir)?;
    }
    let summary: Vec<VariantSummary> = runs.iter().map(VariantSummary::from).collect();
    let path = settings.join_output("comparison.json");
    report::write_json(&path, &summary)?;
    info!(path = %path.display(), "comparison written");
    Ok(())
}
