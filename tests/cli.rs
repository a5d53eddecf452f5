use assert_cmd::Command;

mod common;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("-V");
    cmd.assert()
        .success()
        .stdout(predicates::str::starts_with("cropset "));
}

// Generate subcommand tests

#[test]
fn generate_missing_input_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("generate")
        .arg("--input")
        .arg(temp.path().join("nope"))
        .arg("--output")
        .arg(temp.path().join("out"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("does not exist"));
}

#[test]
fn generate_missing_annotation_file_fails() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("raw");
    std::fs::create_dir_all(&input).expect("create input");

    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("generate")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("out"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Annotation file"));
}

#[test]
fn generate_produces_dataset_tree() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("raw");
    let output = temp.path().join("dataset");
    common::seed_raw_input(&input);

    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("generate")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--scales", "1.0"])
        .args(["--target-width", "64"])
        .args(["--target-height", "64"])
        .args(["--seed", "3"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Wrote 1 positive"));

    assert!(output.join("data.yaml").is_file());
    assert_eq!(
        std::fs::read_dir(output.join("images/train"))
            .expect("list images")
            .count(),
        1
    );
    assert_eq!(
        std::fs::read_dir(output.join("labels/train"))
            .expect("list labels")
            .count(),
        1
    );
}

// Downsample subcommand tests

#[test]
fn downsample_rejects_zero_percentage() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("downsample")
        .arg("--input")
        .arg(temp.path().join("in"))
        .arg("--output")
        .arg(temp.path().join("out"))
        .args(["--percentage", "0"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("percentage"));
}

#[test]
fn downsample_and_merge_pipeline() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let input = temp.path().join("raw");
    let dataset = temp.path().join("dataset");
    common::seed_raw_input(&input);

    let mut generate = Command::cargo_bin("cropset").unwrap();
    generate
        .arg("generate")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&dataset)
        .args(["--scales", "1.0,1.33333"])
        .args(["--target-width", "64"])
        .args(["--target-height", "64"])
        .args(["--seed", "9"]);
    generate.assert().success();

    let reduced = temp.path().join("reduced");
    let mut downsample = Command::cargo_bin("cropset").unwrap();
    downsample
        .arg("downsample")
        .arg("--input")
        .arg(&dataset)
        .arg("--output")
        .arg(&reduced)
        .args(["--percentage", "50"]);
    downsample
        .assert()
        .success()
        .stdout(predicates::str::contains("Kept 1 of 2"));

    let merged = temp.path().join("merged");
    let mut merge = Command::cargo_bin("cropset").unwrap();
    merge
        .arg("merge")
        .arg("--a")
        .arg(&dataset)
        .arg("--b")
        .arg(&reduced)
        .arg("--output")
        .arg(&merged);
    merge.assert().success();

    let merged_images: Vec<String> = std::fs::read_dir(merged.join("images/train"))
        .expect("list images")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(merged_images.len(), 3);
    assert!(merged_images
        .iter()
        .all(|name| name.starts_with("a_") || name.starts_with("b_")));
}

// Augment subcommand tests

#[test]
fn augment_requires_blur_or_noise() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = Command::cargo_bin("cropset").unwrap();
    cmd.arg("augment")
        .arg("--input")
        .arg(temp.path().join("in"))
        .arg("--output")
        .arg(temp.path().join("out"));
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("blur sigma and noise sigma"));
}
