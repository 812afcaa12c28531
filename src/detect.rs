//! Anomaly detection over fetched node records.
//!
//! Narrows the loosely-typed API payload into [`NodeRecord`]s, indexes
//! them by name, and walks the monitored list in configured order. Pure
//! with respect to its inputs — the same payload and monitored list always
//! yield the same result.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// Raw wire shape of one payload entry. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: Option<String>,
    #[serde(default)]
    abnormal: Value,
}

/// One node entry narrowed from the API payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Node name as reported by the API.
    pub name: String,
    /// Whether the API flagged the node abnormal.
    ///
    /// Only the JSON boolean literal `true` counts; a missing field, the
    /// string `"true"`, or the number `1` are all treated as normal.
    pub abnormal: bool,
}

impl NodeRecord {
    /// Narrow a raw payload entry, skipping anything without a string name.
    fn from_value(entry: &Value) -> Option<Self> {
        let raw: RawRecord = serde_json::from_value(entry.clone()).ok()?;
        let name = raw.name?;
        let abnormal = raw.abnormal == Value::Bool(true);
        Some(Self { name, abnormal })
    }
}

/// Build the name → record index. Later duplicates overwrite earlier ones.
fn build_index(entries: &[Value]) -> HashMap<String, NodeRecord> {
    entries
        .iter()
        .filter_map(NodeRecord::from_value)
        .map(|record| (record.name.clone(), record))
        .collect()
}

/// Return the monitored nodes flagged abnormal, in monitored-list order.
///
/// A monitored name absent from the payload is logged as a warning and
/// skipped — it is neither abnormal nor fatal.
pub fn find_abnormal_nodes(entries: &[Value], nodes_to_check: &[String]) -> Vec<String> {
    let index = build_index(entries);
    info!(nodes = %nodes_to_check.join(", "), "checking monitored nodes");

    let mut abnormal = Vec::new();
    for name in nodes_to_check {
        match index.get(name) {
            None => warn!(node = %name, "monitored node not present in API data"),
            Some(record) => {
                info!(node = %name, abnormal = record.abnormal, "node status");
                if record.abnormal {
                    info!(node = %name, "abnormal node detected");
                    abnormal.push(name.clone());
                }
            }
        }
    }
    abnormal
}

// ── Tests ───────────────────────────────────────────────────────
