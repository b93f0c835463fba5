//! Typed view of the merged config document.
//!
//! Every section is optional in YAML; missing keys take the defaults below.
//! Conversion into core types (`settings`, `correlation`, `schedule`) is
//! where range checks happen, so a parse that succeeds can still fail there.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use qpo_core::{
    AngleSchedule, Asset, CorrelationMatrix, OptimizerSettings, PortfolioOptimizer,
    ResourceCeiling, DEFAULT_PENALTY_WEIGHT, DEFAULT_TARGET_COUNT,
};

pub const DEFAULT_LAYERS: usize = 3;

const DEFAULT_RISK_AVERSION: f64 = 0.5;
const DEFAULT_MAX_ASSETS: usize = 20;
const DEFAULT_MAX_AMPLITUDE_BYTES: u64 = 1 << 30;
const DEFAULT_MAX_MIXER_UPDATES: u64 = 1 << 32;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub universe: UniverseConfig,
    pub optimizer: OptimizerSection,
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub assets: Vec<Asset>,
    /// Off-diagonal overrides; unlisted pairs are 0, the diagonal is 1.
    pub correlations: Vec<CorrelationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub i: usize,
    pub j: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSection {
    pub risk_aversion: f64,
    pub target_count: usize,
    pub penalty_weight: f64,
    /// Ignored for `explicit` schedules (their length wins).
    pub layers: Option<usize>,
    pub schedule: ScheduleConfig,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            risk_aversion: DEFAULT_RISK_AVERSION,
            target_count: DEFAULT_TARGET_COUNT,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            layers: None,
            schedule: ScheduleConfig::Linear,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleConfig {
    /// gamma over [0, π/2], beta over [0, π/4], endpoints included.
    #[default]
    Linear,
    /// Both angles scaled by (l+1)/L.
    Ramp,
    Explicit { gammas: Vec<f64>, betas: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_assets: usize,
    pub max_amplitude_bytes: u64,
    /// Bound on layers × assets × 2^assets mixer updates.
    pub max_mixer_updates: u64,
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_assets: DEFAULT_MAX_ASSETS,
            max_amplitude_bytes: DEFAULT_MAX_AMPLITUDE_BYTES,
            max_mixer_updates: DEFAULT_MAX_MIXER_UPDATES,
        }
    }
}

impl OptimizerConfig {
    pub fn from_json(v: &Value) -> Result<Self> {
        let cfg: OptimizerConfig =
            serde_json::from_value(v.clone()).context("CONFIG_SCHEMA: typed parse failed")?;
        Ok(cfg)
    }

    pub fn settings(&self) -> OptimizerSettings {
        OptimizerSettings {
            risk_aversion: self.optimizer.risk_aversion,
            target_count: self.optimizer.target_count,
            penalty_weight: self.optimizer.penalty_weight,
            ceiling: ResourceCeiling {
                max_assets: self.limits.max_assets,
                max_amplitude_bytes: self.limits.max_amplitude_bytes,
                max_mixer_updates: self.limits.max_mixer_updates,
            },
        }
    }

    pub fn correlation(&self) -> Result<CorrelationMatrix> {
        let n = self.universe.assets.len();
        let pairs = self
            .universe
            .correlations
            .iter()
            .map(|e| (e.i, e.j, e.value));
        CorrelationMatrix::from_pairs(n, pairs).context("CONFIG_CORRELATION")
    }

    /// `layers_override` (e.g. from a CLI flag) beats `optimizer.layers`.
    pub fn schedule(&self, layers_override: Option<usize>) -> Result<AngleSchedule> {
        let layers = layers_override
            .or(self.optimizer.layers)
            .unwrap_or(DEFAULT_LAYERS);
        let schedule = match &self.optimizer.schedule {
            ScheduleConfig::Linear => AngleSchedule::linear(layers),
            ScheduleConfig::Ramp => AngleSchedule::ramp(layers),
            ScheduleConfig::Explicit { gammas, betas } => {
                if let Some(l) = layers_override {
                    if l != gammas.len() {
                        bail!(
                            "CONFIG_SCHEDULE: --layers={} conflicts with explicit schedule of {} layer(s)",
                            l,
                            gammas.len()
                        );
                    }
                }
                AngleSchedule::explicit(gammas.clone(), betas.clone())
            }
        };
        schedule.context("CONFIG_SCHEDULE")
    }

    pub fn build_optimizer(&self) -> Result<PortfolioOptimizer> {
        let correlation = self.correlation()?;
        let opt = PortfolioOptimizer::new(
            self.universe.assets.clone(),
            correlation,
            self.settings(),
        )
        .context("CONFIG_OPTIMIZER")?;
        Ok(opt)
    }

    /// Full semantic check: builds the optimizer and refuses penalty weights
    /// too small to keep wrong-cardinality states above every valid one.
    pub fn validate(&self) -> Result<PortfolioOptimizer> {
        let opt = self.build_optimizer()?;
        let energy = opt.energy_model().context("CONFIG_OPTIMIZER")?;
        if !energy.penalty_is_dominant() {
            bail!(
                "CONFIG_PENALTY_NOT_DOMINANT: penalty_weight={} must exceed {:.6} for this universe",
                energy.penalty_weight(),
                energy.dominant_penalty_bound()
            );
        }
        Ok(opt)
    }
}
