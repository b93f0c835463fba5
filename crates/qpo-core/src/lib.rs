//! qpo-core
//!
//! Cardinality-constrained asset selection via a simulated QAOA-style
//! amplitude evolution, with a brute-force oracle.
//! - Asset catalog + correlation structure are owned by the optimizer
//! - QUBO energy with a squared cardinality penalty
//! - Dense 2^n complex state vector, alternating cost-phase / mixer layers
//! - Exhaustive search over fixed-size subsets as correctness oracle
//! - Return / risk / Sharpe metrics for the chosen selection
//! - Pure deterministic logic (no IO, no time, no logging)

mod bits;
mod error;
mod metrics;
mod types;

pub mod correlation;
pub mod energy;
pub mod exhaustive;
pub mod optimizer;
pub mod simulator;

pub use bits::SelectionVector;
pub use correlation::{CorrelationMatrix, CorrelationOverrides};
pub use energy::QuboEnergy;
pub use error::{CorrelationFault, OptimizerError};
pub use exhaustive::search as exhaustive_search;
pub use metrics::{compute_metrics, normalized_weights};
pub use optimizer::{Comparison, OptimizerSettings, PortfolioOptimizer};
pub use simulator::{
    estimate_resources, AmplitudeState, AngleSchedule, LayerObserver, NoopObserver,
    QaoaSimulator, ResourceCeiling, ResourceEstimate, SimulationOutcome, MAX_SUPPORTED_QUBITS,
};
pub use types::{
    Asset, ClassicalResult, EnergyLandscape, LandscapeEntry, OptimizationResult,
    PortfolioMetrics, SimulationReport,
};

/// Penalty weight of the reference configuration.
pub const DEFAULT_PENALTY_WEIGHT: f64 = 10.0;

/// Target cardinality of the reference configuration.
pub const DEFAULT_TARGET_COUNT: usize = 3;
