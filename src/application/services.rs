//! Application services and use cases

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::diff::{diff, DiffEntry};
use crate::domain::pool::{PoolConfigRecord, PoolStateRecord};
use crate::infrastructure::blockchain::{AccountSource, RpcAccount};
use crate::report::{ComparisonReport, PoolSide};
use crate::shared::errors::{ComparisonError, DecodeError, FetchError};
use crate::shared::types::AccountRecord;
use crate::shared::utils::short_address;

/// Fetches, decodes and diffs two pools and their launch configs
#[derive(Clone)]
pub struct PoolComparisonService {
    source: Arc<dyn AccountSource>,
}

impl PoolComparisonService {
    pub fn new(source: Arc<dyn AccountSource>) -> Self {
        Self { source }
    }

    pub async fn compare(
        &self,
        pool1: &str,
        pool2: &str,
    ) -> Result<ComparisonReport, ComparisonError> {
        info!(
            "Comparing pools {} and {}",
            short_address(pool1),
            short_address(pool2)
        );

        let (account1, account2) = futures::join!(
            self.source.fetch_account(pool1),
            self.source.fetch_account(pool2)
        );
        let (account1, account2) = match (account1, account2) {
            (Ok(a), Ok(b)) => (a, b),
            (a, b) => {
                return Err(ComparisonError::PoolsNotFound {
                    pool1_found: a.is_ok(),
                    pool2_found: b.is_ok(),
                })
            }
        };

        let state1 = decode_account(&account1, PoolStateRecord::try_decode);
        let state2 = decode_account(&account2, PoolStateRecord::try_decode);
        if state1.record().is_none() && state2.record().is_none() {
            return Err(ComparisonError::PoolsUndecodable);
        }

        let (config1, config2) = futures::join!(
            self.fetch_config(&state1),
            self.fetch_config(&state2)
        );

        let mut key_differences = BTreeMap::new();
        if let (Some(Ok(a)), Some(Ok(b))) = (&config1, &config2) {
            if let (Some(a), Some(b)) = (a.record(), b.record()) {
                key_differences.extend(diff(a, b));
            }
        }
        if let (Some(a), Some(b)) = (state1.record(), state2.record()) {
            key_differences.extend(prefixed("pool.", diff(a, b)));
        }

        let report = ComparisonReport::new(
            PoolSide::new(state1, config1),
            PoolSide::new(state2, config2),
            key_differences,
        );
        info!("{}", report.summary);
        Ok(report)
    }

    /// Fetch and decode the config a pool state points at.
    ///
    /// `None` when the state did not decode or carries no config address.
    async fn fetch_config(
        &self,
        state: &AccountRecord<PoolStateRecord>,
    ) -> Option<Result<AccountRecord<PoolConfigRecord>, FetchError>> {
        let address = state.record()?.config()?;
        let result = self
            .source
            .fetch_account(address)
            .await
            .map(|account| decode_account(&account, PoolConfigRecord::try_decode));
        Some(result)
    }
}

fn decode_account<R>(
    account: &RpcAccount,
    decode: impl FnOnce(&[u8]) -> Result<R, DecodeError>,
) -> AccountRecord<R> {
    let data = account.decode_data();
    let data_length = data.as_ref().map(Vec::len).unwrap_or(0);
    let decoded = data.and_then(|bytes| decode(&bytes));

    if let Err(e) = &decoded {
        warn!("Failed to decode {}: {}", account.address, e);
    }

    AccountRecord {
        address: account.address.clone(),
        owner: account.owner.clone(),
        data_length,
        decoded,
    }
}

fn prefixed(
    prefix: &str,
    entries: BTreeMap<String, DiffEntry>,
) -> impl Iterator<Item = (String, DiffEntry)> + '_ {
    entries.into_iter().map(move |(key, mut entry)| {
        entry.field_name = format!("{}{}", prefix, entry.field_name);
        (format!("{}{}", prefix, key), entry)
    })
}
