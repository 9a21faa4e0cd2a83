//! Pool domain - bonding-curve pool account layouts

mod config_decoder;
mod state_decoder;

pub use config_decoder::{
    PoolConfigRecord, ENUM_FIELDS, LAYOUT_WINDOWS, MIGRATION_QUOTE_THRESHOLD_LAMPORTS,
};
pub use state_decoder::{PoolStateRecord, BASE_DECIMALS};
