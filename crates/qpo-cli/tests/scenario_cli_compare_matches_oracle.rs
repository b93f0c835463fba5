//! `qpo compare` / `qpo exhaustive` / `qpo sweep`
//!
//! GREEN when:
//! - compare reports the same selection as the brute-force search with 0% improvement.
//! - exhaustive prints the same selection compare reported as classical.
//! - sweep prints one line per requested risk aversion, each matching the oracle.

use assert_cmd::prelude::*;
use std::process::Command;

fn demo_config() -> String {
    format!("{}/../../config/demo.yaml", env!("CARGO_MANIFEST_DIR"))
}

fn field(stdout: &str, key: &str) -> String {
    let prefix = format!("{key}=");
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(prefix.as_str()))
        .map(|s| s.to_string())
        .unwrap()
}

#[test]
fn compare_agrees_with_exhaustive() -> anyhow::Result<()> {
    let out = Command::cargo_bin("qpo")?
        .args(["compare", "--config", &demo_config(), "--no-artifacts"])
        .output()?;
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout)?;

    assert_eq!(field(&stdout, "same_selection"), "true");
    assert_eq!(field(&stdout, "improvement_pct"), "0.000000");
    assert_eq!(field(&stdout, "selection"), field(&stdout, "classical_selection"));

    let ex = Command::cargo_bin("qpo")?
        .args(["exhaustive", "--config", &demo_config()])
        .output()?;
    assert!(ex.status.success());
    let ex_stdout = String::from_utf8(ex.stdout)?;
    assert_eq!(field(&ex_stdout, "mode"), "EXHAUSTIVE");
    assert_eq!(
        field(&ex_stdout, "selection"),
        field(&stdout, "classical_selection")
    );
    Ok(())
}

#[test]
fn sweep_prints_one_line_per_risk_aversion() -> anyhow::Result<()> {
    let out = Command::cargo_bin("qpo")?
        .args([
            "sweep",
            "--config",
            &demo_config(),
            "--risk-aversion",
            "0.2",
            "0.5",
            "0.8",
        ])
        .output()?;
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout)?;

    let points: Vec<&str> = stdout
        .lines()
        .filter(|l| l.starts_with("risk_aversion="))
        .collect();
    assert_eq!(points.len(), 3);
    assert!(points[0].starts_with("risk_aversion=0.2 "));
    assert!(points[2].starts_with("risk_aversion=0.8 "));
    for p in points {
        assert!(p.ends_with("same_selection=true"), "{p}");
    }
    Ok(())
}
