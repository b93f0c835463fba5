//! Command handler modules for qpo-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod exhaustive;
pub mod optimize;
pub mod sweep;

use anyhow::Result;
use qpo_config::{
    report_unused_keys, ConfigMode, LoadedConfig, OptimizerConfig, UnusedKeyPolicy,
};
use qpo_core::{AmplitudeState, Asset, LayerObserver, PortfolioMetrics, SelectionVector};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

pub struct RunConfig {
    pub loaded: LoadedConfig,
    pub config: OptimizerConfig,
}

/// Load + merge + guard + type the config for `mode`.
///
/// `risk_aversion` overrides `optimizer.risk_aversion` after parsing; the
/// config hash always reflects the files, not the override.
pub fn load_run_config(
    config_paths: &[String],
    mode: ConfigMode,
    strict: bool,
    risk_aversion: Option<f64>,
) -> Result<RunConfig> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = qpo_config::load_layered_yaml(&path_refs)?;

    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(mode, &loaded.config_json, policy)?;
    if !report.is_clean() {
        tracing::warn!(
            mode = mode.as_str(),
            unused_leaf_keys = report.unused_leaf_pointers.len(),
            "CONFIG_UNUSED_KEYS"
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            tracing::warn!(unused = %p, "config key not read in this mode");
        }
    }

    let mut config = loaded.typed()?;
    if let Some(x) = risk_aversion {
        config.optimizer.risk_aversion = x;
    }

    Ok(RunConfig { loaded, config })
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Logs every layer boundary.
pub struct TracingObserver;

impl LayerObserver for TracingObserver {
    fn on_layer(&mut self, layer: usize, avg_energy: f64) {
        tracing::info!(layer, avg_energy, "layer complete");
    }

    fn on_state(&mut self, layer: usize, state: &AmplitudeState) {
        tracing::debug!(layer, norm = state.total_probability(), "state norm");
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

pub fn asset_names(selection: &SelectionVector, assets: &[Asset]) -> String {
    selection
        .selected()
        .filter_map(|i| assets.get(i).map(|a| a.name.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn print_metrics(prefix: &str, m: &PortfolioMetrics) {
    println!(
        "{prefix}return={:.6} {prefix}risk={:.6} {prefix}sharpe={:.6}",
        m.portfolio_return, m.risk, m.sharpe_ratio
    );
}
