use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("emolens").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn train_help_lists_variants() {
    let mut cmd = Command::cargo_bin("emolens").expect("binary exists");
    let output = cmd.args(["train", "--help"]).assert().success().get_output().clone();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("lexicon-augmented"));
}

#[test]
fn missing_dataset_fails_cleanly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::cargo_bin("emolens").expect("binary exists");
    cmd.env("DATA_DIR", dir.path().join("data"))
        .env("OUTPUTS_DIR", dir.path().join("outputs"))
        .args(["train", "--variant", "lexical", "--dataset"])
        .arg(dir.path().join("absent.tsv"))
        .assert()
        .failure();
}
