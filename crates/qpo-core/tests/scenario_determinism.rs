//! Determinism of a full optimizer run
//!
//! GREEN when:
//! - two runs with identical inputs (including angles) produce identical
//!   reports, bit for bit
//! - the observer sees exactly the convergence history, in layer order

use qpo_core::{
    AngleSchedule, Asset, CorrelationMatrix, NoopObserver, OptimizerSettings, PortfolioOptimizer,
};

fn optimizer() -> PortfolioOptimizer {
    let assets = vec![
        Asset::new("Tech Stock", 0.12, 0.25),
        Asset::new("Healthcare", 0.08, 0.15),
        Asset::new("Energy", 0.15, 0.30),
        Asset::new("Finance", 0.10, 0.20),
        Asset::new("Real Estate", 0.06, 0.12),
        Asset::new("Utilities", 0.05, 0.09),
    ];
    let corr = CorrelationMatrix::from_pairs(6, [(0, 1, 0.3), (2, 3, -0.3), (4, 5, 0.6)]).unwrap();
    PortfolioOptimizer::new(assets, corr, OptimizerSettings::default()).unwrap()
}

#[test]
fn identical_inputs_identical_reports() {
    let schedule = AngleSchedule::explicit(vec![0.3, 0.9, 1.4], vec![0.7, 0.4, 0.1]).unwrap();

    let a = optimizer().optimize(&schedule, &mut NoopObserver).unwrap();
    let b = optimizer().optimize(&schedule, &mut NoopObserver).unwrap();

    assert_eq!(a, b);
    for (x, y) in a
        .result
        .convergence_history
        .iter()
        .zip(&b.result.convergence_history)
    {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    for (x, y) in a.landscape.entries().iter().zip(b.landscape.entries()) {
        assert_eq!(x.probability.to_bits(), y.probability.to_bits());
    }
}

#[test]
fn observer_sees_convergence_history() {
    let opt = optimizer();
    let schedule = AngleSchedule::linear(5).unwrap();

    let mut seen: Vec<(usize, f64)> = Vec::new();
    let mut record = |layer: usize, e: f64| seen.push((layer, e));
    let report = opt.optimize(&schedule, &mut record).unwrap();

    assert_eq!(seen.len(), 5);
    for (i, (layer, e)) in seen.iter().enumerate() {
        assert_eq!(*layer, i);
        assert_eq!(*e, report.result.convergence_history[i]);
    }
}

#[test]
fn classical_comparison_is_repeatable() {
    let a = optimizer().classical_comparison().unwrap();
    let b = optimizer().classical_comparison().unwrap();
    assert_eq!(a, b);
}
