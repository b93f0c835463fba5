//! qpo-core: exhaustive search
//!
//! Brute-force oracle over all C(n, k) selections of exactly k assets.
//! Masks are visited in ascending integer order, so a strict `<` keeps the
//! lowest-index minimum, the same tie-break as the simulator's measurement.

use crate::bits::{next_same_popcount, SelectionVector};
use crate::energy::QuboEnergy;
use crate::error::OptimizerError;

/// Global minimum-energy selection with exactly `energy.target_count()` assets.
///
/// O(C(n,k)·k²). No 2^n allocation, so only the mask width bounds `n`.
pub fn search(energy: &QuboEnergy<'_>) -> Result<(SelectionVector, f64), OptimizerError> {
    let n = energy.n_assets();
    let k = energy.target_count();
    let max_assets = usize::BITS as usize - 1;

    if n == 0 || k == 0 || k > n || n > max_assets {
        return Err(OptimizerError::InvalidAssetCount {
            assets: n,
            target_count: k,
            max_assets,
        });
    }

    let end = 1usize << n;
    let mut mask = (1usize << k) - 1;
    let mut best: Option<(usize, f64)> = None;

    while mask < end {
        let e = energy.energy_of_state(mask);
        if best.map_or(true, |(_, b)| e < b) {
            best = Some((mask, e));
        }
        mask = next_same_popcount(mask);
    }

    let (state, e) = best.ok_or(OptimizerError::DegenerateState { target_count: k })?;
    Ok((SelectionVector::from_index(state, n), e))
}
