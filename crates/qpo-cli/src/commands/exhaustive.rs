//! `qpo exhaustive`: reference answer only, no state vector.

use anyhow::Result;
use qpo_config::ConfigMode;

use super::{asset_names, load_run_config, print_metrics};

pub fn run_exhaustive(
    config_paths: Vec<String>,
    risk_aversion: Option<f64>,
    strict_config: bool,
) -> Result<()> {
    let mode = ConfigMode::Exhaustive;
    let run = load_run_config(&config_paths, mode, strict_config, risk_aversion)?;
    let opt = run.config.validate()?;

    let classical = opt.classical_comparison()?;
    tracing::info!(
        n_assets = opt.assets().len(),
        energy = classical.energy,
        "exhaustive search complete"
    );

    println!("config_hash={}", run.loaded.config_hash);
    println!("mode={}", mode.as_str());
    println!(
        "n_assets={} target_count={} risk_aversion={}",
        opt.assets().len(),
        opt.settings().target_count,
        opt.settings().risk_aversion
    );
    println!("selection={}", classical.selection);
    println!(
        "selected_assets={}",
        asset_names(&classical.selection, opt.assets())
    );
    println!("energy={:.6}", classical.energy);
    print_metrics("", &classical.metrics);

    Ok(())
}
