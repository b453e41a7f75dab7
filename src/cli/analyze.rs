//! CLI entry-point for lexicon coverage statistics.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    analysis::{emotion_word_coverage, mean_intensity_by_label, CoverageReport},
    cli::InputArgs,
    config::Settings,
    emotion::EmotionMap,
    report,
    text::BasicTokenizer,
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub inputs: InputArgs,
}

#[derive(Debug, Serialize)]
struct AnalysisFile {
    coverage: CoverageReport,
    /// Rows are labels, columns the averaged intensity per emotion.
    mean_intensity: EmotionMap<EmotionMap<f64>>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let docs = args.inputs.load_corpus(&settings)?;
    let lexicon = args.inputs.load_lexicon(&settings)?;
    let tokenizer = BasicTokenizer::default();

    let file = AnalysisFile {
        coverage: emotion_word_coverage(&docs, &tokenizer, &lexicon),
        mean_intensity: mean_intensity_by_label(&docs, &tokenizer, &lexicon),
    };
    for (emotion, pct) in file.coverage.per_label.iter() {
        info!(%emotion, percent = pct, "documents with emotion words");
    }
    let path = settings.join_output("analysis.json");
    report::write_json(&path, &file)?;
    info!(path = %path.display(), overall = file.coverage.overall, "analysis written");
    Ok(())
}
