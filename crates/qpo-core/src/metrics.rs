use crate::bits::SelectionVector;
use crate::correlation::CorrelationMatrix;
use crate::types::{Asset, PortfolioMetrics};

/// Selection normalized to sum 1.
/// An empty selection yields all-zero weights.
pub fn normalized_weights(selection: &SelectionVector) -> Vec<f64> {
    let count = selection.count();
    if count == 0 {
        return vec![0.0; selection.len()];
    }
    let w = 1.0 / count as f64;
    selection
        .as_bits()
        .iter()
        .map(|&b| if b == 1 { w } else { 0.0 })
        .collect()
}

/// Compute return / risk / Sharpe for an equally weighted selection.
///
/// return = Σ w_i·ret_i
/// risk   = sqrt(max(0, Σ_i Σ_j w_i·w_j·risk_i·risk_j·corr_ij))
/// sharpe = return / risk, or 0 when risk == 0
pub fn compute_metrics(
    selection: &SelectionVector,
    assets: &[Asset],
    correlation: &CorrelationMatrix,
) -> PortfolioMetrics {
    let weights = normalized_weights(selection);
    let n = weights.len().min(assets.len()).min(correlation.size());

    let mut portfolio_return = 0.0;
    for i in 0..n {
        portfolio_return += weights[i] * assets[i].expected_return;
    }

    let mut variance = 0.0;
    for i in 0..n {
        if weights[i] == 0.0 {
            continue;
        }
        for j in 0..n {
            variance += weights[i]
                * weights[j]
                * assets[i].risk
                * assets[j].risk
                * correlation.get(i, j);
        }
    }

    // rounding can push a PSD quadratic form slightly below zero
    let risk = variance.max(0.0).sqrt();

    let sharpe_ratio = if risk > 0.0 {
        portfolio_return / risk
    } else {
        0.0
    };

    PortfolioMetrics {
        portfolio_return,
        risk,
        sharpe_ratio,
    }
}
