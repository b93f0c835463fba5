//! qpo-core: optimizer facade
//!
//! Owns the asset catalog and correlation matrix for one universe and wires
//! energy model → simulator / exhaustive search → portfolio metrics.

use serde::{Deserialize, Serialize};

use crate::bits::SelectionVector;
use crate::correlation::CorrelationMatrix;
use crate::energy::QuboEnergy;
use crate::error::OptimizerError;
use crate::exhaustive;
use crate::metrics::{compute_metrics, normalized_weights};
use crate::simulator::{
    estimate_resources, AngleSchedule, LayerObserver, QaoaSimulator, ResourceCeiling,
    ResourceEstimate,
};
use crate::types::{Asset, ClassicalResult, OptimizationResult, SimulationReport};
use crate::{DEFAULT_PENALTY_WEIGHT, DEFAULT_TARGET_COUNT};

/// Scalar parameters of one optimization problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OptimizerSettings {
    /// λ >= 0: weight of the risk term.
    pub risk_aversion: f64,
    /// k: number of assets to select, 0 < k <= n.
    pub target_count: usize,
    /// w: cardinality penalty weight.
    pub penalty_weight: f64,
    pub ceiling: ResourceCeiling,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            risk_aversion: 0.5,
            target_count: DEFAULT_TARGET_COUNT,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            ceiling: ResourceCeiling::standard(),
        }
    }
}

/// Simulator vs exhaustive-search summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub quantum_energy: f64,
    pub classical_energy: f64,
    /// (classical − quantum) / |classical| · 100. None when classical energy is 0.
    pub improvement_pct: Option<f64>,
    pub same_selection: bool,
}

#[derive(Clone, Debug)]
pub struct PortfolioOptimizer {
    assets: Vec<Asset>,
    correlation: CorrelationMatrix,
    settings: OptimizerSettings,
}

impl PortfolioOptimizer {
    /// Validates the universe and settings eagerly.
    pub fn new(
        assets: Vec<Asset>,
        correlation: CorrelationMatrix,
        settings: OptimizerSettings,
    ) -> Result<Self, OptimizerError> {
        let n = assets.len();
        let k = settings.target_count;
        if n == 0 || k == 0 || k > n {
            return Err(OptimizerError::InvalidAssetCount {
                assets: n,
                target_count: k,
                max_assets: settings.ceiling.effective_max_assets(),
            });
        }

        let opt = Self {
            assets,
            correlation,
            settings,
        };
        opt.energy_model()?;
        Ok(opt)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Same universe, different risk aversion.
    pub fn with_risk_aversion(&self, risk_aversion: f64) -> Result<Self, OptimizerError> {
        let settings = OptimizerSettings {
            risk_aversion,
            ..self.settings
        };
        Self::new(self.assets.clone(), self.correlation.clone(), settings)
    }

    /// Energy model borrowing this optimizer's universe.
    pub fn energy_model(&self) -> Result<QuboEnergy<'_>, OptimizerError> {
        QuboEnergy::new(
            &self.assets,
            &self.correlation,
            self.settings.risk_aversion,
            self.settings.target_count,
            self.settings.penalty_weight,
        )
    }

    pub fn estimate(&self, layers: usize) -> ResourceEstimate {
        estimate_resources(self.assets.len(), layers)
    }

    /// Run the layered evolution and package the best valid state.
    pub fn optimize(
        &self,
        schedule: &AngleSchedule,
        observer: &mut dyn LayerObserver,
    ) -> Result<SimulationReport, OptimizerError> {
        let energy = self.energy_model()?;
        let simulator = QaoaSimulator::new(&energy, &self.settings.ceiling)?;
        let outcome = simulator.run(schedule, observer)?;

        let result = self.build_result(
            outcome.best_selection,
            outcome.best_energy,
            outcome.convergence_history,
        );

        Ok(SimulationReport {
            result,
            landscape: outcome.landscape,
            best_state: outcome.best_state,
            best_state_probability: outcome.best_probability,
        })
    }

    /// Exhaustive reference answer over the same restricted state set.
    pub fn classical_comparison(&self) -> Result<ClassicalResult, OptimizerError> {
        let energy = self.energy_model()?;
        let (selection, e) = exhaustive::search(&energy)?;
        let metrics = compute_metrics(&selection, &self.assets, &self.correlation);
        Ok(ClassicalResult {
            selection,
            energy: e,
            metrics,
        })
    }

    pub fn compare(quantum: &SimulationReport, classical: &ClassicalResult) -> Comparison {
        let q = quantum.result.energy;
        let c = classical.energy;
        let improvement_pct = if c == 0.0 {
            None
        } else {
            Some((c - q) / c.abs() * 100.0)
        };
        Comparison {
            quantum_energy: q,
            classical_energy: c,
            improvement_pct,
            same_selection: quantum.result.selection == classical.selection,
        }
    }

    fn build_result(
        &self,
        selection: SelectionVector,
        energy: f64,
        convergence_history: Vec<f64>,
    ) -> OptimizationResult {
        let weights = normalized_weights(&selection);
        let metrics = compute_metrics(&selection, &self.assets, &self.correlation);
        let selected_assets = selection
            .selected()
            .filter_map(|i| self.assets.get(i).cloned())
            .collect();

        OptimizationResult {
            selection,
            selected_assets,
            weights,
            metrics,
            energy,
            convergence_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::NoopObserver;

    fn small() -> PortfolioOptimizer {
        let assets = vec![
            Asset::new("A", 0.10, 0.20),
            Asset::new("B", 0.07, 0.10),
            Asset::new("C", 0.12, 0.30),
            Asset::new("D", 0.04, 0.05),
        ];
        let corr = CorrelationMatrix::from_pairs(4, [(0, 2, 0.6), (1, 3, -0.2)]).unwrap();
        let settings = OptimizerSettings {
            target_count: 2,
            ..OptimizerSettings::default()
        };
        PortfolioOptimizer::new(assets, corr, settings).unwrap()
    }

    #[test]
    fn new_rejects_bad_cardinality() {
        let assets = vec![Asset::new("A", 0.1, 0.1)];
        let err = PortfolioOptimizer::new(
            assets,
            CorrelationMatrix::identity(1),
            OptimizerSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidAssetCount { assets: 1, target_count: 3, .. }));
    }

    #[test]
    fn result_fields_are_consistent() {
        let opt = small();
        let schedule = AngleSchedule::linear(3).unwrap();
        let report = opt.optimize(&schedule, &mut NoopObserver).unwrap();
        let r = &report.result;
        assert_eq!(r.selection.count(), 2);
        assert_eq!(r.selected_assets.len(), 2);
        assert_eq!(r.weights.len(), 4);
        assert_eq!(r.convergence_history.len(), 3);
        assert_eq!(r.selection.to_index(), report.best_state);
        let names: Vec<&str> = r.selected_assets.iter().map(|a| a.name.as_str()).collect();
        let expected: Vec<&str> = r
            .selection
            .selected()
            .map(|i| opt.assets()[i].name.as_str())
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn compare_reports_matching_oracle() {
        let opt = small();
        let schedule = AngleSchedule::ramp(2).unwrap();
        let q = opt.optimize(&schedule, &mut NoopObserver).unwrap();
        let c = opt.classical_comparison().unwrap();
        let cmp = PortfolioOptimizer::compare(&q, &c);
        assert!(cmp.same_selection);
        assert_eq!(cmp.improvement_pct, Some(0.0));
    }

    #[test]
    fn with_risk_aversion_keeps_universe() {
        let opt = small();
        let other = opt.with_risk_aversion(0.9).unwrap();
        assert_eq!(other.assets(), opt.assets());
        assert_eq!(other.settings().risk_aversion, 0.9);
        assert!(opt.with_risk_aversion(-1.0).is_err());
    }
}
