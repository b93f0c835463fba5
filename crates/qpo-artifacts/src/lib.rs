//! qpo-artifacts
//!
//! Run artifact directory for one optimizer invocation:
//!
//! ```text
//! <exports_root>/<run_id>/
//!   manifest.json
//!   optimization_report.json
//!   convergence.csv      layer,avg_energy
//!   landscape.csv        state,selection,energy,probability
//! ```
//!
//! The manifest is written first and lists every artifact; the remaining
//! files are written by the caller once the corresponding results exist.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use qpo_core::{
    Asset, ClassicalResult, Comparison, EnergyLandscape, OptimizationResult, SimulationReport,
};

pub const MANIFEST_JSON: &str = "manifest.json";
pub const REPORT_JSON: &str = "optimization_report.json";
pub const CONVERGENCE_CSV: &str = "convergence.csv";
pub const LANDSCAPE_CSV: &str = "landscape.csv";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub mode: String,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub manifest_json: String,
    pub report_json: String,
    pub convergence_csv: String,
    pub landscape_csv: String,
}

impl Default for ArtifactList {
    fn default() -> Self {
        Self {
            manifest_json: MANIFEST_JSON.to_string(),
            report_json: REPORT_JSON.to_string(),
            convergence_csv: CONVERGENCE_CSV.to_string(),
            landscape_csv: LANDSCAPE_CSV.to_string(),
        }
    }
}

pub struct InitRunArtifactsArgs<'a> {
    pub exports_root: &'a Path, // e.g. ./exports
    pub schema_version: i32,
    pub run_id: Uuid,
    pub mode: &'a str,
    pub config_hash: &'a str,
}

pub struct InitRunArtifactsResult {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
}

pub fn init_run_artifacts(args: InitRunArtifactsArgs<'_>) -> Result<InitRunArtifactsResult> {
    // exports/<run_id>/
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let manifest = RunManifest {
        schema_version: args.schema_version,
        run_id: args.run_id,
        mode: args.mode.to_string(),
        config_hash: args.config_hash.to_string(),
        created_at_utc: Utc::now(),
        artifacts: ArtifactList::default(),
    };

    let manifest_path = run_dir.join(MANIFEST_JSON);
    write_json_pretty(&manifest_path, &manifest).context("write manifest failed")?;

    Ok(InitRunArtifactsResult {
        run_dir,
        manifest_path,
    })
}

/// Everything a downstream plotting step needs from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub run_id: Uuid,
    pub mode: String,
    pub config_hash: String,
    pub risk_aversion: f64,
    pub target_count: usize,
    pub penalty_weight: f64,
    pub assets: Vec<Asset>,
    /// Dense correlation matrix, row-major.
    pub correlation: Vec<Vec<f64>>,
    pub quantum: Option<QuantumSection>,
    pub classical: Option<ClassicalResult>,
    pub comparison: Option<Comparison>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumSection {
    pub layers: usize,
    pub gammas: Vec<f64>,
    pub betas: Vec<f64>,
    pub result: OptimizationResult,
    pub best_state: usize,
    pub best_state_probability: f64,
    pub landscape: EnergyLandscape,
}

impl QuantumSection {
    pub fn from_report(report: &SimulationReport, gammas: &[f64], betas: &[f64]) -> Self {
        Self {
            layers: gammas.len(),
            gammas: gammas.to_vec(),
            betas: betas.to_vec(),
            result: report.result.clone(),
            best_state: report.best_state,
            best_state_probability: report.best_state_probability,
            landscape: report.landscape.clone(),
        }
    }
}

pub fn write_optimization_report(run_dir: &Path, report: &OptimizationReport) -> Result<PathBuf> {
    let path = run_dir.join(REPORT_JSON);
    write_json_pretty(&path, report).context("write optimization report failed")?;
    Ok(path)
}

#[derive(Serialize)]
struct ConvergenceRow {
    layer: usize,
    avg_energy: f64,
}

/// One row per layer (0-based), in evolution order.
pub fn write_convergence_csv(run_dir: &Path, history: &[f64]) -> Result<PathBuf> {
    let path = run_dir.join(CONVERGENCE_CSV);
    let rows = history
        .iter()
        .enumerate()
        .map(|(layer, &avg_energy)| ConvergenceRow { layer, avg_energy });
    write_csv(&path, &["layer", "avg_energy"], rows)?;
    Ok(path)
}

#[derive(Serialize)]
struct LandscapeRow {
    state: usize,
    selection: String,
    energy: f64,
    probability: f64,
}

/// One row per valid selection, ascending state order.
pub fn write_landscape_csv(run_dir: &Path, landscape: &EnergyLandscape) -> Result<PathBuf> {
    let path = run_dir.join(LANDSCAPE_CSV);
    let rows = landscape.entries().iter().map(|e| LandscapeRow {
        state: e.state,
        selection: e.selection.to_string(),
        energy: e.energy,
        probability: e.probability,
    });
    write_csv(&path, &["state", "selection", "energy", "probability"], rows)?;
    Ok(path)
}

// Header is written explicitly so an empty file still carries it.
fn write_csv<T, I>(path: &Path, header: &[&str], rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("open csv failed: {}", path.display()))?;
    wtr.write_record(header)
        .with_context(|| format!("write csv header failed: {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("write csv row failed: {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flush csv failed: {}", path.display()))?;
    Ok(())
}

fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json failed")?;
    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write failed: {}", path.display()))?;
    Ok(())
}
