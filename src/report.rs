// src/report.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::diff::DiffEntry;
use crate::domain::pool::{PoolConfigRecord, PoolStateRecord};
use crate::shared::errors::FetchError;
use crate::shared::types::AccountRecord;

/// Everything decoded for one side of a comparison
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSide {
    pub address: String,
    pub owner: String,
    pub data_length: usize,
    pub state: Option<PoolStateRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_error: Option<String>,

    pub config_address: Option<String>,
    pub config_owner: Option<String>,
    pub config_data_length: Option<usize>,
    pub config: Option<PoolConfigRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

impl PoolSide {
    pub fn new(
        pool: AccountRecord<PoolStateRecord>,
        config: Option<Result<AccountRecord<PoolConfigRecord>, FetchError>>,
    ) -> Self {
        let config_address = pool
            .record()
            .and_then(|state| state.config())
            .map(str::to_string);

        let mut side = Self {
            state_error: pool.error_message(),
            state: pool.decoded.ok(),
            address: pool.address,
            owner: pool.owner,
            data_length: pool.data_length,
            config_address,
            config_owner: None,
            config_data_length: None,
            config: None,
            config_error: None,
        };

        match config {
            Some(Ok(record)) => {
                side.config_error = record.error_message();
                side.config_owner = Some(record.owner);
                side.config_data_length = Some(record.data_length);
                side.config = record.decoded.ok();
            }
            Some(Err(e)) => side.config_error = Some(format!("Config account unavailable: {}", e)),
            None => side.config_error = Some("Pool state carries no config address".to_string()),
        }
        side
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub pool1: PoolSide,
    pub pool2: PoolSide,
    pub key_differences: BTreeMap<String, DiffEntry>,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}

impl ComparisonReport {
    pub fn new(
        pool1: PoolSide,
        pool2: PoolSide,
        key_differences: BTreeMap<String, DiffEntry>,
    ) -> Self {
        let missing: Vec<&str> = [("pool1 config", &pool1), ("pool2 config", &pool2)]
            .iter()
            .filter(|(_, side)| side.config.is_none())
            .map(|(name, _)| *name)
            .collect();
        let summary = summarize(&key_differences, &missing);

        Self {
            pool1,
            pool2,
            key_differences,
            summary,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One-line verdict for a comparison
pub fn summarize(differences: &BTreeMap<String, DiffEntry>, missing: &[&str]) -> String {
    let count = match differences.len() {
        1 => "1 key difference".to_string(),
        n => format!("{} key differences", n),
    };
    if !missing.is_empty() {
        return format!(
            "Comparison incomplete: {} could not be decoded; found {}",
            missing.join(" and "),
            count
        );
    }
    match differences.len() {
        0 => "No obvious differences found in key config fields".to_string(),
        _ => format!("Found {} between the pool configs", count),
    }
}
