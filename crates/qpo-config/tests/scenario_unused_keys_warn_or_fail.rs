//! Unused-key guard
//!
//! GREEN when:
//! - Unknown keys are reported (sorted) under Warn without an error.
//! - Fail policy turns the same report into a CONFIG_UNUSED_KEYS error.
//! - Nested keys under a consumed prefix (asset records) are never flagged.
//! - Exhaustive mode flags evolution-only keys; Simulate mode does not.

use qpo_config::{load_layered_yaml_from_strings, report_unused_keys, ConfigMode, UnusedKeyPolicy};

const FULL_YAML: &str = r#"
universe:
  assets:
    - { name: "A", expected_return: 0.1, risk: 0.2 }
    - { name: "B", expected_return: 0.05, risk: 0.1 }
  correlations:
    - { i: 0, j: 1, value: 0.25 }
optimizer:
  risk_aversion: 0.5
  target_count: 1
  penalty_weight: 10.0
  layers: 2
  schedule:
    kind: linear
limits:
  max_assets: 12
  max_amplitude_bytes: 1048576
  max_mixer_updates: 65536
"#;

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = format!("{FULL_YAML}\nnotes:\n  owner: desk\n  ticket: 42\n");
    let loaded = load_layered_yaml_from_strings(&[yaml.as_str()]).expect("config load must succeed");

    let report = report_unused_keys(
        ConfigMode::Simulate,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )
    .expect("warn mode must not error");

    assert_eq!(report.mode, "SIMULATE");
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/notes/owner".to_string(), "/notes/ticket".to_string()]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = "optimizer:\n  risk_aversoin: 0.7\n";
    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");

    let result = report_unused_keys(ConfigMode::Compare, &loaded.config_json, UnusedKeyPolicy::Fail);
    let msg = format!("{:?}", result.err().unwrap());
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
    assert!(msg.contains("/optimizer/risk_aversoin"));
}

#[test]
fn full_document_is_clean_for_simulate_and_compare() {
    let loaded = load_layered_yaml_from_strings(&[FULL_YAML]).unwrap();
    for mode in [ConfigMode::Simulate, ConfigMode::Compare] {
        let report = report_unused_keys(mode, &loaded.config_json, UnusedKeyPolicy::Fail)
            .expect("every key is consumed");
        assert!(report.is_clean());
    }
}

#[test]
fn exhaustive_mode_flags_evolution_keys() {
    let loaded = load_layered_yaml_from_strings(&[FULL_YAML]).unwrap();
    let report = report_unused_keys(
        ConfigMode::Exhaustive,
        &loaded.config_json,
        UnusedKeyPolicy::Warn,
    )
    .unwrap();

    assert_eq!(
        report.unused_leaf_pointers,
        vec![
            "/limits/max_amplitude_bytes".to_string(),
            "/limits/max_assets".to_string(),
            "/limits/max_mixer_updates".to_string(),
            "/optimizer/layers".to_string(),
            "/optimizer/schedule/kind".to_string(),
        ]
    );
    assert!(!report
        .unused_leaf_pointers
        .iter()
        .any(|p| p.starts_with("/universe")));
}
