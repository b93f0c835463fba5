//! qpo-core: QUBO energy
//!
//! E(s) = -Σ_i s_i·ret_i
//!        + λ · Σ_i Σ_j s_i·s_j·sqrt(risk_i·risk_j)·corr_ij
//!        + w · (Σ_i s_i − k)²
//!
//! Configuration invariant: `w` must be large enough that every selection
//! with the wrong cardinality has higher energy than every selection with
//! cardinality `k`. [`QuboEnergy::penalty_is_dominant`] checks a sufficient
//! bound; callers that load settings from config enforce it.

use crate::bits::SelectionVector;
use crate::correlation::CorrelationMatrix;
use crate::error::{CorrelationFault, OptimizerError};
use crate::types::Asset;

/// Energy model over a fixed universe. Borrows the catalog and matrix.
#[derive(Clone, Debug)]
pub struct QuboEnergy<'a> {
    assets: &'a [Asset],
    correlation: &'a CorrelationMatrix,
    risk_aversion: f64,
    target_count: usize,
    penalty_weight: f64,
    /// sqrt(risk_i·risk_j)·corr_ij, row-major.
    coupling: Vec<f64>,
}

impl<'a> QuboEnergy<'a> {
    pub fn new(
        assets: &'a [Asset],
        correlation: &'a CorrelationMatrix,
        risk_aversion: f64,
        target_count: usize,
        penalty_weight: f64,
    ) -> Result<Self, OptimizerError> {
        let n = assets.len();
        if correlation.size() != n {
            return Err(CorrelationFault::SizeMismatch {
                matrix: correlation.size(),
                assets: n,
            }
            .into());
        }
        for (index, a) in assets.iter().enumerate() {
            if !a.is_valid() {
                return Err(OptimizerError::InvalidAsset {
                    index,
                    name: a.name.clone(),
                });
            }
        }
        check_non_negative("risk_aversion", risk_aversion)?;
        check_non_negative("penalty_weight", penalty_weight)?;

        let mut coupling = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                coupling[i * n + j] =
                    (assets[i].risk * assets[j].risk).sqrt() * correlation.get(i, j);
            }
        }

        Ok(Self {
            assets,
            correlation,
            risk_aversion,
            target_count,
            penalty_weight,
            coupling,
        })
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    pub fn penalty_weight(&self) -> f64 {
        self.penalty_weight
    }

    pub fn assets(&self) -> &'a [Asset] {
        self.assets
    }

    pub fn correlation(&self) -> &'a CorrelationMatrix {
        self.correlation
    }

    /// Energy of a selection. O(n²) in the number of selected assets.
    ///
    /// `selection` must have exactly one bit per asset; a length mismatch is
    /// a caller bug and panics in debug builds. Use `try_energy` for
    /// selections that come from outside the crate.
    pub fn energy(&self, selection: &SelectionVector) -> f64 {
        debug_assert_eq!(
            selection.len(),
            self.n_assets(),
            "selection length does not match asset count"
        );
        let selected: Vec<usize> = selection.selected().collect();
        self.energy_of_selected(&selected)
    }

    /// Checked `energy`: rejects a selection whose length is not n.
    pub fn try_energy(&self, selection: &SelectionVector) -> Result<f64, OptimizerError> {
        if selection.len() != self.n_assets() {
            return Err(OptimizerError::SelectionLength {
                len: selection.len(),
                assets: self.n_assets(),
            });
        }
        Ok(self.energy(selection))
    }

    /// Energy of basis state `state` (its bit decomposition).
    pub fn energy_of_state(&self, state: usize) -> f64 {
        self.energy(&SelectionVector::from_index(state, self.n_assets()))
    }

    fn energy_of_selected(&self, selected: &[usize]) -> f64 {
        let n = self.n_assets();
        let mut energy = 0.0;

        for &i in selected {
            energy -= self.assets[i].expected_return;
        }

        for &i in selected {
            for &j in selected {
                energy += self.risk_aversion * self.coupling[i * n + j];
            }
        }

        let excess = selected.len() as f64 - self.target_count as f64;
        energy += self.penalty_weight * excess * excess;

        energy
    }

    /// Upper bound on |E(s) − penalty(s)| over all selections.
    fn objective_bound(&self) -> f64 {
        let returns: f64 = self.assets.iter().map(|a| a.expected_return.abs()).sum();
        let risk: f64 = self.coupling.iter().map(|c| c.abs()).sum();
        returns + self.risk_aversion * risk
    }

    /// Penalty weight above which cardinality violations always lose.
    ///
    /// A violating selection pays at least `w` on top of an objective
    /// of at least `-B`; a valid one scores at most `B`. So `w > 2B` suffices.
    pub fn dominant_penalty_bound(&self) -> f64 {
        2.0 * self.objective_bound()
    }

    pub fn penalty_is_dominant(&self) -> bool {
        self.penalty_weight > self.dominant_penalty_bound()
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), OptimizerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(OptimizerError::InvalidParameter { name, value });
    }
    Ok(())
}
