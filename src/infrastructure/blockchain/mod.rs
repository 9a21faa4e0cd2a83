//! Direct blockchain reading for pool accounts

pub mod rpc_client;

pub use rpc_client::{AccountSource, RpcAccount, RpcAccountFetcher, DEFAULT_TIMEOUT_MS};
