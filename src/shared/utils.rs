//! Utility functions and helpers

use solana_sdk::pubkey::Pubkey;

use crate::shared::errors::AppError;

/// Lamport-style decimals of the native currency
pub const NATIVE_DECIMALS: u8 = 9;

/// Scale a raw integer amount down by `decimals`
pub fn scale_amount(amount: u64, decimals: u8) -> f64 {
    amount as f64 / 10_f64.powi(decimals as i32)
}

/// Check that `address` is a 32-byte base58 account address
pub fn validate_pool_address(address: &str) -> Result<Pubkey, AppError> {
    address
        .trim()
        .parse()
        .map_err(|e| AppError::InvalidAddress(format!("{}: {}", address, e)))
}

/// Shorten an address for log lines
pub fn short_address(address: &str) -> String {
    if address.len() <= 16 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..8], &address[address.len() - 8..])
}
