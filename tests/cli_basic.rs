//! Integration tests for basic CLI behavior.
//!
//! Everything here runs offline: `scan` works on saved pages and the
//! `extract` cases fail before any request is made.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `rinsefm` binary.
fn rinsefm() -> Command {
    Command::cargo_bin("rinsefm").expect("binary 'rinsefm' should be built")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    rinsefm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: rinsefm"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn version_flag_shows_semver() {
    rinsefm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^rinsefm \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    rinsefm()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: rinsefm"));
}

#[test]
fn invalid_subcommand_fails() {
    rinsefm()
        .arg("nonexistent-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ─── Subcommand help ─────────────────────────────────────────────────────────

#[test]
fn extract_help() {
    rinsefm()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-expected"))
        .stdout(predicate::str::contains("--lenient-probe"))
        .stdout(predicate::str::contains("--chunk-size"));
}

#[test]
fn probe_help() {
    rinsefm()
        .args(["probe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--lenient"));
}

#[test]
fn extract_missing_url_fails() {
    rinsefm()
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

// ─── Extractors ──────────────────────────────────────────────────────────────

#[test]
fn extractors_lists_channel_and_episode() {
    rinsefm()
        .arg("extractors")
        .assert()
        .success()
        .stdout(predicate::str::diff("channel\nepisode\n"));
}

#[test]
fn extract_unsupported_url_fails() {
    rinsefm()
        .args(["extract", "https://example.com/episodes/nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported URL"));
}

#[test]
fn unsupported_url_is_not_skipped() {
    rinsefm()
        .args(["extract", "--skip-expected", "https://rinse.fm/shows/late-night"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported URL"));
}

// ─── Scan ────────────────────────────────────────────────────────────────────

#[test]
fn scan_prints_payload() {
    rinsefm()
        .arg("scan")
        .arg(fixture("episode.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"buildId\": \"rinse\""))
        .stdout(predicate::str::contains("\"episodeLength\": 60"));
}

#[test]
fn scan_entry_prints_only_the_entry() {
    rinsefm()
        .args(["scan", "--entry"])
        .arg(fixture("episode.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Late Night Selections\""))
        .stdout(predicate::str::contains("buildId").not());
}

#[test]
fn scan_with_tiny_chunks_matches() {
    rinsefm()
        .args(["scan", "--entry", "--chunk-size", "3"])
        .arg(fixture("episode.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fileUrl\": \"https://media.rinse.fm/episodes/late-night-selections.mp3\""));
}

#[test]
fn scan_without_payload_fails() {
    rinsefm()
        .arg("scan")
        .arg(fixture("no_payload.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no __NEXT_DATA__ payload found"));
}

#[test]
fn scan_zero_chunk_size_fails() {
    rinsefm()
        .args(["scan", "--chunk-size", "0"])
        .arg(fixture("episode.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("chunk size"));
}

#[test]
fn scan_missing_file_fails() {
    rinsefm()
        .arg("scan")
        .arg(fixture("does-not-exist.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

// ─── Config ──────────────────────────────────────────────────────────────────

#[test]
fn missing_config_file_uses_defaults() {
    rinsefm()
        .args(["--config"])
        .arg(fixture("absent-config.toml"))
        .arg("extractors")
        .assert()
        .success()
        .stdout(predicate::str::contains("episode"));
}

#[test]
fn invalid_config_fails() {
    rinsefm()
        .args(["--config"])
        .arg(fixture("no_payload.html"))
        .arg("extractors")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TOML"));
}
