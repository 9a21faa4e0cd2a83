//! Curated structural diff between two decoded records
//!
//! Only a hand-picked set of keys is compared. Everything else in a
//! record is ignored even when both sides carry it.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::domain::pool::{PoolConfigRecord, PoolStateRecord};

/// A compared key and what a mismatch on it is believed to affect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonKey {
    pub name: &'static str,
    pub impact: &'static str,
}

/// One differing key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffEntry {
    pub field_name: String,
    pub value_a: Value,
    pub value_b: Value,
    pub impact_note: String,
}

/// A decoded record kind with a curated comparison table
pub trait ComparableRecord {
    fn comparison_keys() -> &'static [ComparisonKey];

    /// Value under a curated key; `Value::Null` when absent
    fn comparison_value(&self, key: &str) -> Value;
}

pub const CONFIG_COMPARISON_KEYS: &[ComparisonKey] = &[
    ComparisonKey {
        name: "activationType",
        impact: "Selects slot or timestamp based activation; a mismatch changes when trading opens",
    },
    ComparisonKey {
        name: "feeClaimerEqualsLeftoverReceiver",
        impact: "Whether trading fees and leftover tokens are routed to the same wallet",
    },
    ComparisonKey {
        name: "bytes200to232",
        impact: "Start of the migration block; may hold the migration fee option or target AMM config",
    },
    ComparisonKey {
        name: "bytes232to264",
        impact: "May hold migration fee percentages or the creator fee share",
    },
    ComparisonKey {
        name: "bytes264to296",
        impact: "May hold locked liquidity or vesting parameters applied at migration",
    },
    ComparisonKey {
        name: "feeSection",
        impact: "Base and dynamic fee parameters; differing bytes change swap fees",
    },
];

pub const STATE_COMPARISON_KEYS: &[ComparisonKey] = &[
    ComparisonKey {
        name: "discriminator",
        impact: "Accounts carry different type tags and are not the same record kind",
    },
    ComparisonKey {
        name: "dataLength",
        impact: "Account sizes differ; the pools may come from different program versions",
    },
];

impl ComparableRecord for PoolConfigRecord {
    fn comparison_keys() -> &'static [ComparisonKey] {
        CONFIG_COMPARISON_KEYS
    }

    fn comparison_value(&self, key: &str) -> Value {
        match key {
            "activationType" => self.activation_type_value().map(Value::from).unwrap_or(Value::Null),
            "feeClaimerEqualsLeftoverReceiver" => self
                .fee_claimer_is_leftover_receiver()
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            "feeSection" => optional_string(self.fee_section_hex()),
            window => optional_string(self.layout_window_hex(window)),
        }
    }
}

impl ComparableRecord for PoolStateRecord {
    fn comparison_keys() -> &'static [ComparisonKey] {
        STATE_COMPARISON_KEYS
    }

    fn comparison_value(&self, key: &str) -> Value {
        match key {
            "discriminator" => self.discriminator.value.to_json(),
            "dataLength" => Value::from(self.data_length),
            _ => Value::Null,
        }
    }
}

fn optional_string(value: Option<&str>) -> Value {
    value
        .map(|s| Value::String(s.to_string()))
        .unwrap_or(Value::Null)
}

/// Compare two records of the same kind over their curated keys.
///
/// Returns one entry per key whose values differ; identical records
/// produce an empty map.
pub fn diff<R: ComparableRecord>(a: &R, b: &R) -> BTreeMap<String, DiffEntry> {
    R::comparison_keys()
        .iter()
        .filter_map(|key| {
            let value_a = a.comparison_value(key.name);
            let value_b = b.comparison_value(key.name);
            (value_a != value_b).then(|| {
                (
                    key.name.to_string(),
                    DiffEntry {
                        field_name: key.name.to_string(),
                        value_a,
                        value_b,
                        impact_note: key.impact.to_string(),
                    },
                )
            })
        })
        .collect()
}
