//! Tests for the blogsmith binary
//!
//! Each test runs the binary against a fresh temporary HOME and database
//! with no API key configured.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn blogsmith(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("blogsmith").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("DATABASE_URL", dir.path().join("blogs.db"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("OPENAI_MODEL")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("BLOGSMITH_BIND")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("regenerate"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_generate_without_api_key_fails() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .args(["generate", "Rust for Beginners"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY is missing"));
}

#[test]
fn test_generate_with_no_titles_fails() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .args(["generate", " , "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No valid titles were provided."));
}

#[test]
fn test_generate_rejects_unknown_tone() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .args(["generate", "Alpha", "--tone", "Loud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tone: 'Loud'"));
}

#[test]
fn test_blogs_on_empty_database() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .arg("blogs")
        .assert()
        .success()
        .stdout(predicate::str::contains("No blogs found."));

    assert!(dir.path().join("blogs.db").exists());
}

#[test]
fn test_show_and_download_unknown_blog() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .args(["show", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Blog not found."));

    blogsmith(&dir)
        .args(["download", "5", "-o", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Blog not found."));
}

#[test]
fn test_config_reports_missing_key() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("OPENAI_API_KEY is not set"))
        .stdout(predicate::str::contains("gpt-4o-mini"));

    blogsmith(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".blogsmith"));
}

#[test]
fn test_completions_generate_script() {
    let dir = tempdir().unwrap();
    blogsmith(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blogsmith"));
}
