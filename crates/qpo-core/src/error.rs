// ─── CorrelationFault ────────────────────────────────────────────────────────

/// Why a correlation input was rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum CorrelationFault {
    /// An override value lies outside [-1, 1] (or is NaN).
    ValueOutOfRange { i: usize, j: usize, value: f64 },
    /// An override index is not in [0, n).
    IndexOutOfRange { i: usize, j: usize, n: usize },
    /// A diagonal override other than 1.0 was supplied.
    NonUnitDiagonal { i: usize, value: f64 },
    /// A dense row does not have n entries (or the row count is not n).
    NotSquare { row: usize, len: usize, n: usize },
    /// `M[i][j] != M[j][i]`: dense rows disagree, or an override pair was
    /// given in both orders with different values.
    Asymmetric { i: usize, j: usize },
    /// The same `(i, j)` override was given twice with different values.
    DuplicatePair { i: usize, j: usize },
    /// Matrix dimension differs from the asset count.
    SizeMismatch { matrix: usize, assets: usize },
}

impl std::fmt::Display for CorrelationFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValueOutOfRange { i, j, value } => {
                write!(f, "correlation ({i},{j}) = {value} is outside [-1, 1]")
            }
            Self::IndexOutOfRange { i, j, n } => {
                write!(f, "correlation index ({i},{j}) out of range for {n} assets")
            }
            Self::NonUnitDiagonal { i, value } => {
                write!(f, "diagonal entry ({i},{i}) must be 1.0, got {value}")
            }
            Self::NotSquare { row, len, n } => {
                write!(f, "row {row} has {len} entries, expected {n}")
            }
            Self::Asymmetric { i, j } => write!(f, "entries ({i},{j}) and ({j},{i}) differ"),
            Self::DuplicatePair { i, j } => {
                write!(f, "correlation ({i},{j}) given twice with different values")
            }
            Self::SizeMismatch { matrix, assets } => {
                write!(f, "matrix is {matrix}x{matrix} but there are {assets} assets")
            }
        }
    }
}

// ─── OptimizerError ──────────────────────────────────────────────────────────

/// Errors produced by the core. All are raised at the point of detection
/// and none are retryable: the computation is pure.
#[derive(Clone, Debug, PartialEq)]
pub enum OptimizerError {
    /// Asset count is zero, smaller than the target cardinality, or beyond
    /// the simulation ceiling.
    InvalidAssetCount {
        assets: usize,
        target_count: usize,
        max_assets: usize,
    },
    /// Correlation input is not a valid correlation matrix.
    InvalidCorrelation(CorrelationFault),
    /// Layer count must be > 0.
    InvalidLayerCount { layers: usize },
    /// Angle schedule does not match the layer count or has non-finite angles.
    InvalidSchedule { layers: usize, gammas: usize, betas: usize },
    /// An asset record carries a non-finite return or a negative/non-finite risk.
    InvalidAsset { index: usize, name: String },
    /// A scalar parameter (risk aversion, penalty weight) is negative or non-finite.
    InvalidParameter { name: &'static str, value: f64 },
    /// No basis state satisfies the cardinality constraint.
    DegenerateState { target_count: usize },
    /// A selection vector's length differs from the asset count.
    SelectionLength { len: usize, assets: usize },
}

impl std::fmt::Display for OptimizerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAssetCount {
                assets,
                target_count,
                max_assets,
            } => write!(
                f,
                "invalid asset count {assets} (target_count={target_count}, max_assets={max_assets})"
            ),
            Self::InvalidCorrelation(fault) => write!(f, "invalid correlation: {fault}"),
            Self::InvalidLayerCount { layers } => {
                write!(f, "layer count must be > 0, got {layers}")
            }
            Self::InvalidSchedule {
                layers,
                gammas,
                betas,
            } => write!(
                f,
                "angle schedule invalid for {layers} layers ({gammas} gammas, {betas} betas, all must be finite)"
            ),
            Self::InvalidAsset { index, name } => {
                write!(f, "asset #{index} '{name}' has invalid return/risk")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "parameter {name} must be finite and >= 0, got {value}")
            }
            Self::DegenerateState { target_count } => {
                write!(f, "no basis state selects exactly {target_count} assets")
            }
            Self::SelectionLength { len, assets } => {
                write!(f, "selection has {len} bits but there are {assets} assets")
            }
        }
    }
}

impl std::error::Error for OptimizerError {}

impl From<CorrelationFault> for OptimizerError {
    fn from(fault: CorrelationFault) -> Self {
        Self::InvalidCorrelation(fault)
    }
}
