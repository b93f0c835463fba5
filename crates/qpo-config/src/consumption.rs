//! Config consumption map + unused-key guard.
//!
//! “Consumed pointers” are JSON Pointer prefixes. A leaf under any consumed
//! prefix is consumed; every other leaf is "unused". Callers pick whether
//! unused keys warn or fail via `UnusedKeyPolicy`.
//!
//! The registry must reflect what the code actually reads in each mode.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    /// Layered evolution only.
    Simulate,
    /// Brute-force oracle only (no layers, no schedule, no state-vector limits).
    Exhaustive,
    /// Both, plus the comparison.
    Compare,
}

impl ConfigMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigMode::Simulate => "SIMULATE",
            ConfigMode::Exhaustive => "EXHAUSTIVE",
            ConfigMode::Compare => "COMPARE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    pub mode: String,
    /// Consumed JSON-pointer prefixes used for this analysis (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Minimal set of unused leaf pointers (sorted)
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Energy-model keys, read in every mode.
const PROBLEM: &[&str] = &[
    "/universe/assets",
    "/universe/correlations",
    "/optimizer/risk_aversion",
    "/optimizer/target_count",
    "/optimizer/penalty_weight",
];

/// Simulator-only keys.
const EVOLUTION: &[&str] = &[
    "/optimizer/layers",
    "/optimizer/schedule",
    "/limits/max_assets",
    "/limits/max_amplitude_bytes",
    "/limits/max_mixer_updates",
];

/// Registry of consumed JSON-pointer prefixes per mode.
pub fn consumed_pointers_for_mode(mode: ConfigMode) -> Vec<&'static str> {
    match mode {
        ConfigMode::Exhaustive => PROBLEM.to_vec(),
        ConfigMode::Simulate | ConfigMode::Compare => {
            PROBLEM.iter().chain(EVOLUTION.iter()).copied().collect()
        }
    }
}

/// Unused-key report for `mode`. With `UnusedKeyPolicy::Fail` a non-empty
/// report becomes a `CONFIG_UNUSED_KEYS` error.
pub fn report_unused_keys(
    mode: ConfigMode,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let consumed: Vec<KeyPath> = consumed_pointers_for_mode(mode)
        .into_iter()
        .map(parse_pointer)
        .collect();

    let unused: BTreeSet<String> = leaf_paths(config_json)
        .into_iter()
        .filter(|leaf| !consumed.iter().any(|c| leaf.starts_with(c)))
        .map(|leaf| render_pointer(&leaf))
        .collect();
    let consumed_prefixes: BTreeSet<String> =
        consumed.iter().map(|c| render_pointer(c)).collect();

    let report = UnusedKeyReport {
        mode: mode.as_str().to_string(),
        consumed_prefixes: consumed_prefixes.into_iter().collect(),
        unused_leaf_pointers: unused.into_iter().collect(),
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let shown = report.unused_leaf_pointers.iter().take(PREVIEW_KEYS);
        bail!(
            "CONFIG_UNUSED_KEYS: {} mode does not read {} key(s): {}",
            report.mode,
            report.unused_leaf_pointers.len(),
            shown.cloned().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(report)
}

const PREVIEW_KEYS: usize = 12;

/// Unescaped reference tokens; empty is the document root.
type KeyPath = Vec<String>;

fn parse_pointer(p: &str) -> KeyPath {
    p.split('/')
        .filter(|t| !t.is_empty())
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect()
}

fn render_pointer(path: &[String]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    path.iter()
        .map(|t| format!("/{}", t.replace('~', "~0").replace('/', "~1")))
        .collect()
}

/// Paths of every scalar in the document. Empty objects and arrays
/// contribute nothing.
fn leaf_paths(root: &Value) -> Vec<KeyPath> {
    let mut leaves = Vec::new();
    let mut pending: Vec<(KeyPath, &Value)> = vec![(Vec::new(), root)];
    while let Some((path, node)) = pending.pop() {
        let children: Vec<(String, &Value)> = match node {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => {
                leaves.push(path);
                continue;
            }
        };
        for (token, child) in children {
            let mut next = path.clone();
            next.push(token);
            pending.push((next, child));
        }
    }
    leaves
}
