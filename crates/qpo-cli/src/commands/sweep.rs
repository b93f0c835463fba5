//! `qpo sweep`: one optimize + compare per risk aversion, one line each.

use anyhow::{bail, Result};
use qpo_config::ConfigMode;
use qpo_core::{NoopObserver, PortfolioOptimizer};

use super::load_run_config;

pub fn run_sweep(
    config_paths: Vec<String>,
    risk_aversions: Vec<f64>,
    layers: Option<usize>,
    strict_config: bool,
) -> Result<()> {
    if risk_aversions.is_empty() {
        bail!("SWEEP_EMPTY: at least one --risk-aversion value is required");
    }

    let mode = ConfigMode::Compare;
    let run = load_run_config(&config_paths, mode, strict_config, None)?;
    let schedule = run.config.schedule(layers)?;

    println!("config_hash={}", run.loaded.config_hash);
    println!("layers={}", schedule.layers());

    for lambda in risk_aversions {
        let mut cfg = run.config.clone();
        cfg.optimizer.risk_aversion = lambda;
        let opt = cfg.validate()?;

        let quantum = opt.optimize(&schedule, &mut NoopObserver)?;
        let classical = opt.classical_comparison()?;
        let cmp = PortfolioOptimizer::compare(&quantum, &classical);
        tracing::info!(risk_aversion = lambda, energy = quantum.result.energy, "sweep point");

        let m = &quantum.result.metrics;
        println!(
            "risk_aversion={} selection={} energy={:.6} return={:.6} risk={:.6} sharpe={:.6} classical_energy={:.6} same_selection={}",
            lambda,
            quantum.result.selection,
            quantum.result.energy,
            m.portfolio_return,
            m.risk,
            m.sharpe_ratio,
            classical.energy,
            cmp.same_selection
        );
    }

    Ok(())
}
