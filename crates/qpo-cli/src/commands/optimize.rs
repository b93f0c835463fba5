//! `qpo optimize` and `qpo compare`.

use anyhow::Result;
use qpo_artifacts::{
    init_run_artifacts, write_convergence_csv, write_landscape_csv, write_optimization_report,
    InitRunArtifactsArgs, OptimizationReport, QuantumSection,
};
use qpo_config::ConfigMode;
use qpo_core::PortfolioOptimizer;
use std::path::Path;
use uuid::Uuid;

use super::{asset_names, load_run_config, print_metrics, TracingObserver};
use crate::RunArgs;

const ARTIFACT_SCHEMA_VERSION: i32 = 1;

pub fn run_optimize(args: RunArgs, with_comparison: bool) -> Result<()> {
    let mode = if with_comparison {
        ConfigMode::Compare
    } else {
        ConfigMode::Simulate
    };
    let run = load_run_config(
        &args.config_paths,
        mode,
        args.strict_config,
        args.risk_aversion,
    )?;
    let opt = run.config.validate()?;
    let schedule = run.config.schedule(args.layers)?;

    let est = opt.estimate(schedule.layers());
    tracing::info!(
        mode = mode.as_str(),
        n_assets = opt.assets().len(),
        layers = schedule.layers(),
        basis_states = est.basis_states,
        amplitude_bytes = est.amplitude_bytes,
        mixer_updates = est.mixer_updates,
        "starting evolution"
    );

    let quantum = opt.optimize(&schedule, &mut TracingObserver)?;
    let r = &quantum.result;

    println!("config_hash={}", run.loaded.config_hash);
    println!("mode={}", mode.as_str());
    println!(
        "n_assets={} target_count={} layers={} risk_aversion={}",
        opt.assets().len(),
        opt.settings().target_count,
        schedule.layers(),
        opt.settings().risk_aversion
    );
    println!("selection={}", r.selection);
    println!("selected_assets={}", asset_names(&r.selection, opt.assets()));
    println!("energy={:.6}", r.energy);
    print_metrics("", &r.metrics);
    println!(
        "best_state={} best_state_probability={:.6} valid_probability={:.6}",
        quantum.best_state,
        quantum.best_state_probability,
        quantum.landscape.valid_probability()
    );
    println!("convergence_layers={}", r.convergence_history.len());

    let (classical, comparison) = if with_comparison {
        let classical = opt.classical_comparison()?;
        let cmp = PortfolioOptimizer::compare(&quantum, &classical);
        println!("classical_selection={}", classical.selection);
        println!(
            "classical_assets={}",
            asset_names(&classical.selection, opt.assets())
        );
        println!("classical_energy={:.6}", classical.energy);
        print_metrics("classical_", &classical.metrics);
        match cmp.improvement_pct {
            Some(pct) => println!("improvement_pct={:.6}", pct),
            None => println!("improvement_pct=n/a"),
        }
        println!("same_selection={}", cmp.same_selection);
        (Some(classical), Some(cmp))
    } else {
        (None, None)
    };

    if args.no_artifacts {
        return Ok(());
    }

    let run_id = Uuid::new_v4();
    let art = init_run_artifacts(InitRunArtifactsArgs {
        exports_root: Path::new(&args.exports_root),
        schema_version: ARTIFACT_SCHEMA_VERSION,
        run_id,
        mode: mode.as_str(),
        config_hash: &run.loaded.config_hash,
    })?;

    let report = OptimizationReport {
        run_id,
        mode: mode.as_str().to_string(),
        config_hash: run.loaded.config_hash.clone(),
        risk_aversion: opt.settings().risk_aversion,
        target_count: opt.settings().target_count,
        penalty_weight: opt.settings().penalty_weight,
        assets: opt.assets().to_vec(),
        correlation: opt.correlation().to_rows(),
        quantum: Some(QuantumSection::from_report(
            &quantum,
            schedule.gammas(),
            schedule.betas(),
        )),
        classical,
        comparison,
    };
    write_optimization_report(&art.run_dir, &report)?;
    write_convergence_csv(&art.run_dir, &r.convergence_history)?;
    write_landscape_csv(&art.run_dir, &quantum.landscape)?;

    tracing::info!(
        run_dir = %art.run_dir.display(),
        manifest = %art.manifest_path.display(),
        "artifacts written"
    );
    println!("run_id={}", run_id);
    println!("exports_dir={}", art.run_dir.display());
    println!("manifest_path={}", art.manifest_path.display());

    Ok(())
}
