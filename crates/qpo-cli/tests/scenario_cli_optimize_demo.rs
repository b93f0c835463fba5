//! `qpo optimize` on the demo universe
//!
//! GREEN when:
//! - The run succeeds and selects exactly three of the five demo assets.
//! - `convergence_layers` equals the configured (or overridden) layer count.
//! - With artifacts enabled, `exports/<run_id>/` holds the manifest, report and both CSVs.
//! - `manifest_path` on stdout names that run's manifest, which carries the run id and config hash.
//! - `--no-artifacts` leaves the exports root untouched.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn demo_config() -> String {
    format!("{}/../../config/demo.yaml", env!("CARGO_MANIFEST_DIR"))
}

fn field<'a>(stdout: &'a str, key: &str) -> &'a str {
    let prefix = format!("{key}=");
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(prefix.as_str()))
        .unwrap()
}

#[test]
fn optimize_selects_three_assets() -> anyhow::Result<()> {
    let exports = tempfile::tempdir()?;
    let out = Command::cargo_bin("qpo")?
        .args(["optimize", "--config", &demo_config(), "--no-artifacts"])
        .arg("--exports-root")
        .arg(exports.path())
        .output()?;
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout)?;
    let selection = field(&stdout, "selection");
    assert_eq!(selection.len(), 5);
    assert_eq!(selection.chars().filter(|&c| c == '1').count(), 3);
    assert_eq!(field(&stdout, "convergence_layers"), "4");
    assert_eq!(field(&stdout, "selected_assets").split(',').count(), 3);

    assert_eq!(fs::read_dir(exports.path())?.count(), 0);
    Ok(())
}

#[test]
fn layers_flag_overrides_config() -> anyhow::Result<()> {
    Command::cargo_bin("qpo")?
        .args([
            "optimize",
            "--config",
            &demo_config(),
            "--layers",
            "2",
            "--no-artifacts",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("convergence_layers=2"));
    Ok(())
}

#[test]
fn artifacts_are_written_under_run_id() -> anyhow::Result<()> {
    let exports = tempfile::tempdir()?;
    let out = Command::cargo_bin("qpo")?
        .args(["optimize", "--config", &demo_config()])
        .arg("--exports-root")
        .arg(exports.path())
        .output()?;
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout)?;
    let run_id = field(&stdout, "run_id");
    let run_dir = exports.path().join(run_id);

    for name in [
        "manifest.json",
        "optimization_report.json",
        "convergence.csv",
        "landscape.csv",
    ] {
        assert!(run_dir.join(name).is_file(), "missing {name}");
    }

    let manifest_path = std::path::PathBuf::from(field(&stdout, "manifest_path"));
    assert_eq!(manifest_path, run_dir.join("manifest.json"));
    let manifest: serde_json::Value = serde_json::from_str(&fs::read_to_string(&manifest_path)?)?;
    assert_eq!(manifest["run_id"], run_id);
    assert_eq!(manifest["config_hash"], field(&stdout, "config_hash"));

    let landscape = fs::read_to_string(run_dir.join("landscape.csv"))?;
    // header + C(5,3) rows
    assert_eq!(landscape.lines().count(), 1 + 10);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("optimization_report.json"))?)?;
    assert_eq!(report["mode"], "SIMULATE");
    assert_eq!(report["assets"].as_array().map(|a| a.len()), Some(5));
    assert!(report["comparison"].is_null());
    Ok(())
}
