//! CLI end-to-end tests
//!
//! Tests for the steadyforge command-line interface that need no ffmpeg.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the steadyforge binary with no directory settings
/// inherited from the environment.
#[allow(deprecated)]
fn steadyforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("steadyforge").unwrap();
    cmd.env_remove("INPUT_DIR")
        .env_remove("OUTPUT_DIR")
        .env_remove("FFMPEG_PATH")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = steadyforge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("steadyforge"))
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = steadyforge_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("steadyforge"));
}

#[test]
fn test_cli_rejects_unknown_flag() {
    let mut cmd = steadyforge_cmd();
    cmd.arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_empty_input_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("notes.txt"), b"not a video").unwrap();

    let mut cmd = steadyforge_cmd();
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No video files found"));

    assert!(output.is_dir(), "output directory should be created");
}

#[test]
fn test_cli_default_directories_from_env() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("raw");
    fs::create_dir(&input).unwrap();

    let mut cmd = steadyforge_cmd();
    cmd.current_dir(dir.path())
        .env("INPUT_DIR", &input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No video files found"));

    // OUTPUT_DIR unset: ./output relative to the working directory.
    assert!(dir.path().join("output").is_dir());
}

#[test]
fn test_cli_missing_input_directory() {
    let dir = tempdir().unwrap();

    let mut cmd = steadyforge_cmd();
    cmd.arg("--input")
        .arg(dir.path().join("missing"))
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read input directory"));
}

#[test]
fn test_cli_uncreatable_output_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("clip.mp4"), b"raw").unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();

    let mut cmd = steadyforge_cmd();
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(blocker.join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot create output directory"));
}

#[cfg(unix)]
#[test]
fn test_cli_read_only_output_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    fs::write(input.join("clip.mp4"), b"raw").unwrap();
    fs::set_permissions(&output, fs::Permissions::from_mode(0o555)).unwrap();
    // Permission bits do not bind root; skip when the directory stays writable.
    if fs::write(output.join("writable-check"), b"").is_ok() {
        return;
    }

    let mut cmd = steadyforge_cmd();
    let assert = cmd
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert();
    fs::set_permissions(&output, fs::Permissions::from_mode(0o755)).unwrap();

    assert
        .code(2)
        .stderr(predicate::str::contains("output directory is not writable"));
}

#[test]
fn test_cli_report_for_empty_batch() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    let report = dir.path().join("report.json");

    let mut cmd = steadyforge_cmd();
    cmd.arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["outcomes"].as_array().map(Vec::len), Some(0));
}
