//! Error handling for the application

use thiserror::Error;

/// Fixed-width reader errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("Read of {len} bytes at offset {offset} exceeds buffer of {data_len} bytes")]
    OutOfRange {
        offset: usize,
        len: usize,
        data_len: usize,
    },
}

/// Base58 text errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Base58Error {
    #[error("Invalid base58 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// Account decode errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Layout read failed: {0}")]
    Read(#[from] ReadError),

    #[error("Account payload is not valid base64: {0}")]
    Base64(String),
}

/// Account fetch errors.
///
/// Every variant means the account is unavailable; the variant only
/// records why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Account {0} does not exist")]
    AccountMissing(String),

    #[error("RPC transport failed: {0}")]
    Transport(String),

    #[error("RPC call timed out after {0} ms")]
    Timeout(u64),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),
}

/// Pool comparison errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("Failed to fetch one or both pool accounts")]
    PoolsNotFound { pool1_found: bool, pool2_found: bool },

    #[error("Failed to decode both pool accounts")]
    PoolsUndecodable,
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid pool address: {0}")]
    InvalidAddress(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

