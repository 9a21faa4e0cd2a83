//! Diff domain - field-by-field comparison of decoded records

mod structural_differ;

pub use structural_differ::{
    diff, ComparableRecord, ComparisonKey, DiffEntry, CONFIG_COMPARISON_KEYS,
    STATE_COMPARISON_KEYS,
};
