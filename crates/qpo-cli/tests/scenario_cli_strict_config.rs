//! Unused-key guard at the CLI boundary
//!
//! GREEN when:
//! - An unknown key passes with a warning by default.
//! - `--strict-config` turns it into a CONFIG_UNUSED_KEYS failure.
//! - A too-small penalty weight fails with CONFIG_PENALTY_NOT_DOMINANT.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn demo_config() -> String {
    format!("{}/../../config/demo.yaml", env!("CARGO_MANIFEST_DIR"))
}

fn overlay(dir: &tempfile::TempDir, body: &str) -> String {
    let path = dir.path().join("overlay.yaml");
    fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn unknown_key_warns_by_default_and_fails_when_strict() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let extra = overlay(&dir, "optimizer:\n  shots: 1024\n");

    Command::cargo_bin("qpo")?
        .args(["optimize", "--no-artifacts", "--config", &demo_config(), "--config", &extra])
        .assert()
        .success()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));

    Command::cargo_bin("qpo")?
        .args([
            "optimize",
            "--no-artifacts",
            "--strict-config",
            "--config",
            &demo_config(),
            "--config",
            &extra,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"))
        .stderr(predicate::str::contains("/optimizer/shots"));
    Ok(())
}

#[test]
fn weak_penalty_is_refused() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let weak = overlay(&dir, "optimizer:\n  penalty_weight: 0.01\n");

    Command::cargo_bin("qpo")?
        .args(["exhaustive", "--config", &demo_config(), "--config", &weak])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_PENALTY_NOT_DOMINANT"));
    Ok(())
}
