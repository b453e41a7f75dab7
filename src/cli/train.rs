//! CLI entry-point for training a single feature variant.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    cli::{pipeline_config, InputArgs},
    config::Settings,
    pipeline::{self, Variant},
    report,
    text::{BasicTokenizer, Lexicon},
};

/// Args for the `train` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Feature blocks fed to the classifier.
    #[arg(long, default_value = "lexicon-augmented", value_enum)]
    pub variant: Variant,
    #[command(flatten)]
    pub inputs: InputArgs,
    /// Lexical features reported per label.
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let split = args.inputs.load_split(&settings)?;
    let lexicon = if args.variant.uses_lexicon() {
        Some(args.inputs.load_lexicon(&settings)?)
    } else {
        None
    };
    let tokenizer = BasicTokenizer::default();
    let config = pipeline_config(&settings, args.top_k);

    let run = pipeline::run(
        &split,
        args.variant,
        &tokenizer,
        lexicon.as_ref().map(|lexicon| lexicon as &dyn Lexicon),
        &config,
    )?;
    let dir = report::write_run(&run, &settings.outputs_dir)?;
    info!(
        variant = %run.variant,
        sample_f1 = run.metrics.sample_f1,
        path = %dir.display(),
        "training run complete"
    );
    Ok(())
}
