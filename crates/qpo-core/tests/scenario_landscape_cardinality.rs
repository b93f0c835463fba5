//! Energy landscape covers exactly the cardinality-satisfying states
//!
//! GREEN when:
//! - len(landscape) == C(n, k)
//! - every entry selects exactly k assets, states are strictly ascending
//! - entry energies equal the energy model evaluated on the entry's bits
//! - landscape probabilities are valid and sum to at most 1

use qpo_core::{
    AngleSchedule, Asset, CorrelationMatrix, NoopObserver, OptimizerSettings, PortfolioOptimizer,
};

fn binomial(n: usize, k: usize) -> usize {
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

fn universe(n: usize) -> (Vec<Asset>, CorrelationMatrix) {
    let assets = (0..n)
        .map(|i| Asset::new(format!("A{i}"), 0.03 + 0.01 * i as f64, 0.1 + 0.02 * i as f64))
        .collect();
    let corr = CorrelationMatrix::from_pairs(n, [(0, 1, 0.4), (1, 2, -0.3)]).unwrap();
    (assets, corr)
}

#[test]
fn landscape_size_and_membership() {
    for (n, k) in [(3, 1), (3, 3), (5, 3), (6, 2), (8, 4), (10, 5)] {
        let (assets, corr) = universe(n);
        let settings = OptimizerSettings {
            target_count: k,
            ..OptimizerSettings::default()
        };
        let opt = PortfolioOptimizer::new(assets, corr, settings).unwrap();
        let report = opt
            .optimize(&AngleSchedule::linear(2).unwrap(), &mut NoopObserver)
            .unwrap();
        let energy = opt.energy_model().unwrap();

        let entries = report.landscape.entries();
        assert_eq!(entries.len(), binomial(n, k), "n={n} k={k}");

        let mut prev: Option<usize> = None;
        let mut mass = 0.0;
        for e in entries {
            assert_eq!(e.selection.count(), k);
            assert_eq!(e.selection.to_index(), e.state);
            assert_eq!(e.energy, energy.energy(&e.selection));
            assert!((0.0..=1.0 + 1e-12).contains(&e.probability));
            if let Some(p) = prev {
                assert!(e.state > p);
            }
            prev = Some(e.state);
            mass += e.probability;
        }
        assert!(mass <= 1.0 + 1e-9);

        let best = report.landscape.get(report.best_state).unwrap();
        assert_eq!(best.energy, report.result.energy);
        assert_eq!(best.probability, report.best_state_probability);
        assert!(entries.iter().all(|e| e.energy >= report.result.energy));
    }
}
