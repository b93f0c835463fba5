//! qpo-core: amplitude-evolution simulator
//!
//! Dense classical simulation of a QAOA-style circuit over all 2^n subsets.
//!
//! Per layer `l`:
//! 1. cost phase: `a[s] *= exp(-i·γ_l·E(s))` for every basis state
//! 2. mixer: for q = 0..n in increasing order, with `prior` the vector as
//!    it stood before qubit q's pass:
//!    `a[s] = cos(β_l)·prior[s] − i·sin(β_l)·prior[s ⊕ (1<<q)]`
//! 3. record `Σ_s |a[s]|²·E(s)`
//!
//! Each qubit pass reads only the previous pass's buffer and writes a second
//! buffer; the two are swapped afterwards. Reading partially updated entries,
//! or one snapshot shared by all qubits, breaks unitarity.
//!
//! Measurement happens once, after the last layer: among states whose
//! popcount equals the target cardinality, the minimum-energy state wins
//! (first minimum in ascending index order).
//!
//! Memory and time are O(2^n) and O(L·n·2^n). n is capped at
//! [`MAX_SUPPORTED_QUBITS`] and by the caller's [`ResourceCeiling`], both
//! checked before anything is allocated.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use num_complex::Complex64;

use crate::bits::SelectionVector;
use crate::energy::QuboEnergy;
use crate::error::OptimizerError;
use crate::types::{EnergyLandscape, LandscapeEntry};

/// Largest asset count the dense simulator will ever accept.
pub const MAX_SUPPORTED_QUBITS: usize = 30;

const BYTES_PER_AMPLITUDE: u64 = std::mem::size_of::<Complex64>() as u64;
const BYTES_PER_ENERGY: u64 = std::mem::size_of::<f64>() as u64;

// ─── Resources ───────────────────────────────────────────────────────────────

/// Caller-supplied safety ceiling for one simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceCeiling {
    pub max_assets: usize,
    /// Upper bound on state-vector memory (both buffers + energy table).
    pub max_amplitude_bytes: u64,
    /// Upper bound on L·n·2^n mixer amplitude updates for one run.
    pub max_mixer_updates: u64,
}

impl ResourceCeiling {
    /// 20 assets, 1 GiB, 2^32 mixer updates.
    pub fn standard() -> Self {
        Self {
            max_assets: 20,
            max_amplitude_bytes: 1 << 30,
            max_mixer_updates: 1 << 32,
        }
    }

    /// Effective asset cap after the hard limit.
    pub fn effective_max_assets(&self) -> usize {
        self.max_assets.min(MAX_SUPPORTED_QUBITS)
    }
}

impl Default for ResourceCeiling {
    fn default() -> Self {
        Self::standard()
    }
}

/// Up-front cost of simulating `n` assets over `layers` layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceEstimate {
    pub basis_states: u64,
    pub amplitude_bytes: u64,
    /// Amplitude updates across all mixer passes: L·n·2^n.
    pub mixer_updates: u64,
}

/// Saturating estimate; never overflows for absurd `n`.
pub fn estimate_resources(n: usize, layers: usize) -> ResourceEstimate {
    let basis_states = if n >= 64 { u64::MAX } else { 1u64 << n };
    let per_state = 2 * BYTES_PER_AMPLITUDE + BYTES_PER_ENERGY;
    ResourceEstimate {
        basis_states,
        amplitude_bytes: basis_states.saturating_mul(per_state),
        mixer_updates: basis_states
            .saturating_mul(n as u64)
            .saturating_mul(layers as u64),
    }
}

// ─── AngleSchedule ───────────────────────────────────────────────────────────

/// Per-layer (γ, β) angles.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSchedule {
    gammas: Vec<f64>,
    betas: Vec<f64>,
}

impl AngleSchedule {
    /// Evenly spaced with inclusive endpoints: γ over [0, π/2], β over [0, π/4].
    /// A single layer gets (0, 0).
    pub fn linear(layers: usize) -> Result<Self, OptimizerError> {
        if layers == 0 {
            return Err(OptimizerError::InvalidLayerCount { layers });
        }
        Ok(Self {
            gammas: linspace(FRAC_PI_2, layers),
            betas: linspace(FRAC_PI_4, layers),
        })
    }

    /// γ_l = (π/2)·(l+1)/L, β_l = (π/4)·(l+1)/L. Never starts at zero.
    pub fn ramp(layers: usize) -> Result<Self, OptimizerError> {
        if layers == 0 {
            return Err(OptimizerError::InvalidLayerCount { layers });
        }
        let frac = |l: usize| (l + 1) as f64 / layers as f64;
        Ok(Self {
            gammas: (0..layers).map(|l| FRAC_PI_2 * frac(l)).collect(),
            betas: (0..layers).map(|l| FRAC_PI_4 * frac(l)).collect(),
        })
    }

    /// Externally supplied angles. Lengths must match and be > 0; all finite.
    pub fn explicit(gammas: Vec<f64>, betas: Vec<f64>) -> Result<Self, OptimizerError> {
        if gammas.is_empty() && betas.is_empty() {
            return Err(OptimizerError::InvalidLayerCount { layers: 0 });
        }
        let finite = gammas.iter().chain(betas.iter()).all(|a| a.is_finite());
        if gammas.len() != betas.len() || !finite {
            return Err(OptimizerError::InvalidSchedule {
                layers: gammas.len().max(betas.len()),
                gammas: gammas.len(),
                betas: betas.len(),
            });
        }
        Ok(Self { gammas, betas })
    }

    pub fn layers(&self) -> usize {
        self.gammas.len()
    }

    pub fn gammas(&self) -> &[f64] {
        &self.gammas
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }
}

fn linspace(stop: f64, num: usize) -> Vec<f64> {
    if num == 1 {
        return vec![0.0];
    }
    let step = stop / (num - 1) as f64;
    let mut out: Vec<f64> = (0..num).map(|i| i as f64 * step).collect();
    out[num - 1] = stop;
    out
}

// ─── LayerObserver ───────────────────────────────────────────────────────────

/// Progress hook invoked after every layer. Both methods default to no-ops.
pub trait LayerObserver {
    fn on_layer(&mut self, _layer: usize, _avg_energy: f64) {}

    /// Read-only view of the state at the layer boundary.
    fn on_state(&mut self, _layer: usize, _state: &AmplitudeState) {}
}

/// Observer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl LayerObserver for NoopObserver {}

impl<F> LayerObserver for F
where
    F: FnMut(usize, f64),
{
    fn on_layer(&mut self, layer: usize, avg_energy: f64) {
        self(layer, avg_energy)
    }
}

// ─── AmplitudeState ──────────────────────────────────────────────────────────

/// Complex amplitudes over 2^n basis states, plus the mixer's second buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct AmplitudeState {
    n_qubits: usize,
    amplitudes: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl AmplitudeState {
    /// Uniform superposition: every amplitude 1/sqrt(2^n).
    pub fn uniform(n_qubits: usize) -> Self {
        let dim = 1usize << n_qubits;
        let a = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
        Self {
            n_qubits,
            amplitudes: vec![a; dim],
            scratch: vec![Complex64::new(0.0, 0.0); dim],
        }
    }

    /// Start from a single basis state with amplitude 1.
    pub fn basis(n_qubits: usize, state: usize) -> Self {
        let dim = 1usize << n_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];
        if state < dim {
            amplitudes[state] = Complex64::new(1.0, 0.0);
        }
        Self {
            n_qubits,
            amplitudes,
            scratch: vec![Complex64::new(0.0, 0.0); dim],
        }
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn probability(&self, state: usize) -> f64 {
        self.amplitudes.get(state).map_or(0.0, |a| a.norm_sqr())
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Σ|a|². Stays at 1 under every step below.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Σ|a[s]|²·E(s).
    pub fn expected_energy(&self, energies: &[f64]) -> f64 {
        self.amplitudes
            .iter()
            .zip(energies)
            .map(|(a, e)| a.norm_sqr() * e)
            .sum()
    }

    /// Phase-only rotation; entries are independent.
    pub fn apply_cost_phase(&mut self, gamma: f64, energies: &[f64]) {
        debug_assert_eq!(energies.len(), self.amplitudes.len());
        for (a, &e) in self.amplitudes.iter_mut().zip(energies) {
            *a *= Complex64::from_polar(1.0, -gamma * e);
        }
    }

    /// X-rotation on every qubit, qubit 0 first.
    pub fn apply_mixer(&mut self, beta: f64) {
        let cos_b = Complex64::new(beta.cos(), 0.0);
        let minus_i_sin_b = Complex64::new(0.0, -beta.sin());

        for q in 0..self.n_qubits {
            let bit = 1usize << q;
            let prior = &self.amplitudes;
            for (s, out) in self.scratch.iter_mut().enumerate() {
                *out = cos_b * prior[s] + minus_i_sin_b * prior[s ^ bit];
            }
            std::mem::swap(&mut self.amplitudes, &mut self.scratch);
        }
    }
}

// ─── QaoaSimulator ───────────────────────────────────────────────────────────

/// What one run produces before portfolio metrics are attached.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationOutcome {
    pub convergence_history: Vec<f64>,
    pub landscape: EnergyLandscape,
    pub best_state: usize,
    pub best_selection: SelectionVector,
    pub best_energy: f64,
    pub best_probability: f64,
}

/// Runs the layered evolution for one energy model.
#[derive(Debug)]
pub struct QaoaSimulator<'e, 'a> {
    energy: &'e QuboEnergy<'a>,
    ceiling: ResourceCeiling,
    energies: Vec<f64>,
}

impl<'e, 'a> QaoaSimulator<'e, 'a> {
    /// Checks cardinality and memory, then tabulates E(s) for every state.
    /// The work bound depends on the layer count and is checked in `run`.
    pub fn new(
        energy: &'e QuboEnergy<'a>,
        ceiling: &ResourceCeiling,
    ) -> Result<Self, OptimizerError> {
        let n = energy.n_assets();
        let k = energy.target_count();
        let max_assets = ceiling.effective_max_assets();
        let invalid = OptimizerError::InvalidAssetCount {
            assets: n,
            target_count: k,
            max_assets,
        };

        if n == 0 || k == 0 || k > n || n > max_assets {
            return Err(invalid);
        }
        if estimate_resources(n, 1).amplitude_bytes > ceiling.max_amplitude_bytes {
            return Err(invalid);
        }

        let energies = (0..1usize << n)
            .map(|s| energy.energy_of_state(s))
            .collect();
        Ok(Self {
            energy,
            ceiling: *ceiling,
            energies,
        })
    }

    /// E(s) indexed by basis state.
    pub fn energy_table(&self) -> &[f64] {
        &self.energies
    }

    /// Evolve through every layer of `schedule` and measure.
    pub fn run(
        &self,
        schedule: &AngleSchedule,
        observer: &mut dyn LayerObserver,
    ) -> Result<SimulationOutcome, OptimizerError> {
        if schedule.layers() == 0 {
            return Err(OptimizerError::InvalidLayerCount { layers: 0 });
        }
        let n = self.energy.n_assets();
        let work = estimate_resources(n, schedule.layers()).mixer_updates;
        if work > self.ceiling.max_mixer_updates {
            return Err(OptimizerError::InvalidAssetCount {
                assets: n,
                target_count: self.energy.target_count(),
                max_assets: self.ceiling.effective_max_assets(),
            });
        }

        let mut state = AmplitudeState::uniform(n);
        let mut convergence_history = Vec::with_capacity(schedule.layers());

        let angles = schedule.gammas().iter().zip(schedule.betas());
        for (layer, (&gamma, &beta)) in angles.enumerate() {
            state.apply_cost_phase(gamma, &self.energies);
            state.apply_mixer(beta);

            let avg_energy = state.expected_energy(&self.energies);
            convergence_history.push(avg_energy);
            observer.on_layer(layer, avg_energy);
            observer.on_state(layer, &state);
        }

        self.measure(&state, convergence_history)
    }

    fn measure(
        &self,
        state: &AmplitudeState,
        convergence_history: Vec<f64>,
    ) -> Result<SimulationOutcome, OptimizerError> {
        let n = self.energy.n_assets();
        let k = self.energy.target_count();

        let mut entries = Vec::new();
        let mut best: Option<(usize, f64)> = None;

        for (s, &energy) in self.energies.iter().enumerate() {
            if s.count_ones() as usize != k {
                continue;
            }
            entries.push(LandscapeEntry {
                state: s,
                selection: SelectionVector::from_index(s, n),
                energy,
                probability: state.probability(s),
            });
            // strict: first minimum in ascending index order wins
            if best.map_or(true, |(_, e)| energy < e) {
                best = Some((s, energy));
            }
        }

        let (best_state, best_energy) =
            best.ok_or(OptimizerError::DegenerateState { target_count: k })?;

        Ok(SimulationOutcome {
            convergence_history,
            landscape: EnergyLandscape::from_entries(entries),
            best_state,
            best_selection: SelectionVector::from_index(best_state, n),
            best_energy,
            best_probability: state.probability(best_state),
        })
    }
}
