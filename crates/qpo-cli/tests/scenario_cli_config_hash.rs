//! `qpo config-hash`
//!
//! GREEN when:
//! - The demo config prints a 64-hex `config_hash=` line and canonical JSON.
//! - Two invocations print the same hash.
//! - A missing path fails with the path in the error.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn demo_config() -> String {
    format!("{}/../../config/demo.yaml", env!("CARGO_MANIFEST_DIR"))
}

fn hash_line(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .find(|l| l.starts_with("config_hash="))
        .map(|l| l.to_string())
        .unwrap()
}

#[test]
fn config_hash_is_stable_across_invocations() -> anyhow::Result<()> {
    let a = Command::cargo_bin("qpo")?
        .args(["config-hash", &demo_config()])
        .output()?;
    let b = Command::cargo_bin("qpo")?
        .args(["config-hash", &demo_config()])
        .output()?;
    assert!(a.status.success());

    let line = hash_line(&a.stdout);
    assert_eq!(line.len(), "config_hash=".len() + 64);
    assert_eq!(line, hash_line(&b.stdout));

    let stdout = String::from_utf8_lossy(&a.stdout);
    assert!(stdout.contains("\"universe\""));
    Ok(())
}

#[test]
fn missing_config_path_fails() -> anyhow::Result<()> {
    Command::cargo_bin("qpo")?
        .args(["config-hash", "/no/such/qpo.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/qpo.yaml"));
    Ok(())
}
