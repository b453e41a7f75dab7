use std::io::Write;

use emolens::{
    data::{read_corpus, stratified_split, Document, Split},
    features::{FeatureBuilder, NgramRange},
    labels::{parse_label_set, LabelBinarizer, LabelSet},
    model::MultiLabelTrainer,
    pipeline::{run, PipelineConfig, Variant},
    report::{self, CLASSIFICATION_REPORT_FILE, IMPORTANCE_FILE, METRICS_FILE},
    text::{BasicTokenizer, IntensityLexicon, Lexicon},
    Emotion,
};

const CORPUS: &str = "\
I am furious about this\t1
so angry and furious today\t1
this makes me furious again\t1, 3
absolutely furious with them\t1
what a lovely happy day\t5
happy and thrilled right now\t5,7
I feel happy and calm\t5
such a happy surprise\t5, 7
";

const LEXICON: &str = "\
word\temotion\tscore
furious\tanger\t0.93
angry\tanger\t0.82
happy\tjoy\t0.74
thrilled\tjoy\t0.8
surprise\tsurprise\t0.7
";

fn fixtures(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let corpus = dir.join("corpus.tsv");
    let lexicon = dir.join("lexicon.txt");
    std::fs::File::create(&corpus)
        .unwrap()
        .write_all(CORPUS.as_bytes())
        .unwrap();
    std::fs::File::create(&lexicon)
        .unwrap()
        .write_all(LEXICON.as_bytes())
        .unwrap();
    (corpus, lexicon)
}

#[test]
fn two_runs_on_the_same_split_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let (corpus, lexicon_path) = fixtures(dir.path());
    let docs = read_corpus(&corpus).unwrap();
    let split = stratified_split(&docs, 0.25, 42).unwrap();
    let lexicon = IntensityLexicon::load(&lexicon_path).unwrap();
    let tokenizer = BasicTokenizer::default();
    let config = PipelineConfig::default();

    let first = run(
        &split,
        Variant::LexiconAugmented,
        &tokenizer,
        Some(&lexicon as &dyn Lexicon),
        &config,
    )
    .unwrap();
    let second = run(
        &split,
        Variant::LexiconAugmented,
        &tokenizer,
        Some(&lexicon as &dyn Lexicon),
        &config,
    )
    .unwrap();
    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first, second);
    assert_eq!(first.test_documents, 2);
}

#[test]
fn reports_are_written_per_variant() {
    let dir = tempfile::tempdir().unwrap();
    let (corpus, _) = fixtures(dir.path());
    let docs = read_corpus(&corpus).unwrap();
    let split = stratified_split(&docs, 0.25, 7).unwrap();
    let report = run(
        &split,
        Variant::Lexical,
        &BasicTokenizer::default(),
        None,
        &PipelineConfig::default(),
    )
    .unwrap();

    let outputs = dir.path().join("outputs");
    let written = report::write_run(&report, &outputs).unwrap();
    assert_eq!(written, outputs.join("lexical"));
    for file in [METRICS_FILE, CLASSIFICATION_REPORT_FILE, IMPORTANCE_FILE] {
        assert!(written.join(file).exists(), "{file} missing");
    }

    let metrics: serde_json::Value =
        serde_json::from_reader(std::fs::File::open(written.join(METRICS_FILE)).unwrap()).unwrap();
    assert_eq!(metrics["variant"], "lexical");
    assert!(metrics["metrics"]["per_label"]["anger"]["f1"].is_number());

    let csv = std::fs::read_to_string(written.join(CLASSIFICATION_REPORT_FILE)).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "label,precision,recall,f1,support,auc");
    assert_eq!(lines.len(), 1 + 8 + 4);
    assert!(lines[1].starts_with("anger,"));
}

fn toy_documents() -> Vec<Document> {
    vec![
        Document::new("I am furious", parse_label_set("1").unwrap()),
        Document::new("I am thrilled and surprised", parse_label_set("5,7").unwrap()),
    ]
}

#[test]
fn anger_separator_splits_the_toy_corpus() {
    let docs = toy_documents();
    let texts: Vec<&str> = docs.iter().map(|doc| doc.text.as_str()).collect();
    let tokenizer = BasicTokenizer::default();
    let builder = FeatureBuilder::new(NgramRange::new(1, 2).unwrap());
    let vocabulary = builder.fit_texts(&texts, &tokenizer).unwrap();
    let x = builder.featurize(&texts, &vocabulary, &tokenizer, None).unwrap();
    let labels: Vec<LabelSet> = docs.iter().map(|doc| doc.labels.clone()).collect();
    let y = LabelBinarizer::new().fit_transform(&labels);

    let model = MultiLabelTrainer::default().train(&x, &y).unwrap();
    let anger = model.separator(Emotion::Anger);
    assert!(anger.decision(&x, 0) > 0.0);
    assert!(anger.decision(&x, 1) < 0.0);
}

#[test]
fn toy_corpus_scores_perfect_sample_f1_on_itself() {
    let docs = toy_documents();
    let split = Split {
        train: docs.clone(),
        test: docs,
    };
    let config = PipelineConfig {
        ngram_range: NgramRange::new(1, 2).unwrap(),
        ..PipelineConfig::default()
    };
    let report = run(
        &split,
        Variant::Lexical,
        &BasicTokenizer::default(),
        None,
        &config,
    )
    .unwrap();
    assert_eq!(report.metrics.sample_f1, 1.0);
    assert_eq!(report.metrics.per_label[Emotion::Fear].f1, 0.0);
}
