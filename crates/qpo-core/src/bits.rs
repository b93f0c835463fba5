use serde::{Deserialize, Serialize};

/// One bit per asset: `bits[i] == 1` means asset `i` is selected.
///
/// The same subset doubles as a basis-state index into the 2^n state space,
/// with asset `i` mapped to bit `i` (little-endian).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionVector {
    bits: Vec<u8>,
}

impl SelectionVector {
    /// Decompose a basis-state index into `n` selection bits.
    pub fn from_index(index: usize, n: usize) -> Self {
        let bits = (0..n).map(|i| ((index >> i) & 1) as u8).collect();
        Self { bits }
    }

    /// Build from explicit selected asset indices. Out-of-range indices are ignored.
    pub fn from_indices(indices: &[usize], n: usize) -> Self {
        let mut bits = vec![0u8; n];
        for &i in indices {
            if i < n {
                bits[i] = 1;
            }
        }
        Self { bits }
    }

    pub fn empty(n: usize) -> Self {
        Self { bits: vec![0u8; n] }
    }

    /// Inverse of [`from_index`](Self::from_index).
    pub fn to_index(&self) -> usize {
        self.bits
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, &b)| acc | ((b as usize & 1) << i))
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn is_selected(&self, i: usize) -> bool {
        self.bits.get(i).copied().unwrap_or(0) == 1
    }

    /// Number of selected assets.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Selected asset indices in ascending order.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == 1)
            .map(|(i, _)| i)
    }

    pub fn as_bits(&self) -> &[u8] {
        &self.bits
    }
}

impl std::fmt::Display for SelectionVector {
    /// Asset order, e.g. `10110` selects assets 0, 2, 3.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in &self.bits {
            write!(f, "{b}")?;
        }
        Ok(())
    }
}

/// Next larger integer with the same popcount (Gosper's hack).
///
/// Enumerates fixed-cardinality masks in ascending integer order.
pub(crate) fn next_same_popcount(x: usize) -> usize {
    let c = x & x.wrapping_neg();
    let r = x + c;
    (((r ^ x) >> 2) / c) | r
}
