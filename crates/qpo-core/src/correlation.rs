//! qpo-core: correlation
//!
//! Symmetric n×n correlation structure with unit diagonal.
//!
//! Built once from the asset count and a sparse override map of
//! `(i, j) -> value`; unspecified off-diagonal pairs default to 0.
//! Shared read-only by energy, simulator, exhaustive search and metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CorrelationFault, OptimizerError};

/// Sparse override map. Each unordered pair may be given in either order;
/// both orders must then agree.
pub type CorrelationOverrides = BTreeMap<(usize, usize), f64>;

/// Dense row-major correlation matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    n: usize,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Identity correlation (all assets uncorrelated).
    pub fn identity(n: usize) -> Self {
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        Self { n, values }
    }

    /// Build from sparse overrides.
    ///
    /// Fails on an index outside [0, n), a value outside [-1, 1], a
    /// diagonal override other than 1.0, or `(i, j)` and `(j, i)` both
    /// given with different values.
    pub fn build(n: usize, overrides: &CorrelationOverrides) -> Result<Self, OptimizerError> {
        let mut m = Self::identity(n);
        let mut seen: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (&(i, j), &value) in overrides {
            if i >= n || j >= n {
                return Err(CorrelationFault::IndexOutOfRange { i, j, n }.into());
            }
            if !(-1.0..=1.0).contains(&value) {
                return Err(CorrelationFault::ValueOutOfRange { i, j, value }.into());
            }
            if i == j {
                if value != 1.0 {
                    return Err(CorrelationFault::NonUnitDiagonal { i, value }.into());
                }
                continue;
            }
            let (a, b) = (i.min(j), i.max(j));
            if let Some(&prev) = seen.get(&(a, b)) {
                if prev != value {
                    return Err(CorrelationFault::Asymmetric { i: a, j: b }.into());
                }
            }
            seen.insert((a, b), value);
            m.values[a * n + b] = value;
            m.values[b * n + a] = value;
        }
        Ok(m)
    }

    /// Build from pair triples, e.g. straight from a config file.
    ///
    /// Repeating a pair with the same value is harmless; a different value
    /// fails with `DuplicatePair` (same order) or `Asymmetric` (mirrored).
    pub fn from_pairs<I>(n: usize, pairs: I) -> Result<Self, OptimizerError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut overrides = CorrelationOverrides::new();
        for (i, j, v) in pairs {
            if let Some(prev) = overrides.insert((i, j), v) {
                if prev != v {
                    return Err(CorrelationFault::DuplicatePair { i, j }.into());
                }
            }
        }
        Self::build(n, &overrides)
    }

    /// Validate a dense matrix: square, symmetric, unit diagonal, entries in [-1, 1].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, OptimizerError> {
        let n = rows.len();
        let mut values = Vec::with_capacity(n * n);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != n {
                return Err(CorrelationFault::NotSquare {
                    row,
                    len: r.len(),
                    n,
                }
                .into());
            }
            values.extend_from_slice(r);
        }

        for i in 0..n {
            let d = values[i * n + i];
            if d != 1.0 {
                return Err(CorrelationFault::NonUnitDiagonal { i, value: d }.into());
            }
            for j in (i + 1)..n {
                let v = values[i * n + j];
                if !(-1.0..=1.0).contains(&v) {
                    return Err(CorrelationFault::ValueOutOfRange { i, j, value: v }.into());
                }
                if v != values[j * n + i] {
                    return Err(CorrelationFault::Asymmetric { i, j }.into());
                }
            }
        }

        Ok(Self { n, values })
    }

    /// Number of assets.
    pub fn size(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Rows as nested vectors (for heatmap consumers).
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.n.max(1)).map(|r| r.to_vec()).collect()
    }
}
