/// Shared state passed to every route handler
use chrono::{DateTime, Utc};

use crate::application::PoolComparisonService;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no RPC endpoint was configured
    pub comparison: Option<PoolComparisonService>,

    /// Used when a request omits `pool1` / `pool2`
    pub default_pool1: String,
    pub default_pool2: String,

    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        comparison: Option<PoolComparisonService>,
        default_pool1: String,
        default_pool2: String,
    ) -> Self {
        Self {
            comparison,
            default_pool1,
            default_pool2,
            startup_time: Utc::now(),
        }
    }

    pub fn rpc_configured(&self) -> bool {
        self.comparison.is_some()
    }
}
