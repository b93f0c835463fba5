use serde::{Deserialize, Serialize};

use crate::bits::SelectionVector;

/// A single investable asset (immutable input record).
///
/// `risk` is a standard-deviation-like figure and must be >= 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub expected_return: f64,
    pub risk: f64,
}

impl Asset {
    pub fn new<S: Into<String>>(name: S, expected_return: f64, risk: f64) -> Self {
        Self {
            name: name.into(),
            expected_return,
            risk,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.expected_return.is_finite() && self.risk.is_finite() && self.risk >= 0.0
    }
}

/// Return / risk / Sharpe figures for an equally weighted selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    #[serde(rename = "return")]
    pub portfolio_return: f64,
    pub risk: f64,
    /// return / risk, or 0 when risk is 0 (no risk-free rate).
    pub sharpe_ratio: f64,
}

/// One cardinality-satisfying basis state after the final layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandscapeEntry {
    /// Basis-state index (selection read as an unsigned integer, bit i = asset i).
    pub state: usize,
    pub selection: SelectionVector,
    pub energy: f64,
    /// |amplitude|^2 after the last layer.
    pub probability: f64,
}

/// Energy/probability of every valid selection, in ascending state order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyLandscape {
    entries: Vec<LandscapeEntry>,
}

impl EnergyLandscape {
    pub(crate) fn from_entries(entries: Vec<LandscapeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LandscapeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, state: usize) -> Option<&LandscapeEntry> {
        self.entries
            .binary_search_by_key(&state, |e| e.state)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Probability mass held by valid selections.
    pub fn valid_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Highest-probability entry (lowest state index on ties).
    pub fn most_probable(&self) -> Option<&LandscapeEntry> {
        let mut best: Option<&LandscapeEntry> = None;
        for e in &self.entries {
            match best {
                Some(b) if e.probability <= b.probability => {}
                _ => best = Some(e),
            }
        }
        best
    }
}

/// Outcome of one optimizer run (immutable once produced).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub selection: SelectionVector,
    pub selected_assets: Vec<Asset>,
    /// Selection normalized to sum 1 (all zeros for an empty selection).
    pub weights: Vec<f64>,
    pub metrics: PortfolioMetrics,
    pub energy: f64,
    /// Expected energy after each layer, in layer order.
    pub convergence_history: Vec<f64>,
}

/// Simulator output handed to reporting consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub result: OptimizationResult,
    pub landscape: EnergyLandscape,
    /// Basis-state index of `result.selection`.
    pub best_state: usize,
    /// Final probability of the chosen state.
    pub best_state_probability: f64,
}

/// Exhaustive-search reference answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassicalResult {
    pub selection: SelectionVector,
    pub energy: f64,
    pub metrics: PortfolioMetrics,
}
