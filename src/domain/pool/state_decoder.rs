//! Pool state account decoder

use serde::Serialize;
use tracing::debug;

use super::config_decoder::{gated, DISCRIMINATOR_LEN};
use crate::codec::AccountReader;
use crate::shared::errors::DecodeError;
use crate::shared::types::{DecodedField, ScaledAmount};
use crate::shared::utils::NATIVE_DECIMALS;

pub const CONFIG_OFFSET: usize = 72;
pub const CREATOR_OFFSET: usize = 104;
pub const BASE_MINT_OFFSET: usize = 136;
pub const BASE_VAULT_OFFSET: usize = 168;
pub const QUOTE_VAULT_OFFSET: usize = 200;
pub const BASE_RESERVE_OFFSET: usize = 232;
pub const QUOTE_RESERVE_OFFSET: usize = 240;

/// Launched tokens use 6 decimals; the quote side is native SOL
pub const BASE_DECIMALS: u8 = 6;

/// Decoded bonding-curve pool state account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStateRecord {
    pub data_length: usize,
    pub discriminator: DecodedField,
    pub config_address: Option<DecodedField>,
    pub creator_address: Option<DecodedField>,
    pub base_mint_address: Option<DecodedField>,
    pub base_vault_address: Option<DecodedField>,
    pub quote_vault_address: Option<DecodedField>,
    pub base_reserve: Option<ScaledAmount>,
    pub quote_reserve: Option<ScaledAmount>,
}

impl PoolStateRecord {
    pub fn try_decode(data: &[u8]) -> Result<Self, DecodeError> {
        let reader = AccountReader::new(data);
        let len = reader.len();

        let discriminator = reader.hex_field("discriminator", 0, DISCRIMINATOR_LEN)?;
        let address = |name: &str, offset: usize| {
            gated(len >= offset + 32, || reader.address_field(name, offset))
        };
        let reserve = |offset: usize, decimals: u8| {
            gated(len >= offset + 8, || {
                reader
                    .read_u64_le(offset)
                    .map(|raw| ScaledAmount::new(raw, decimals))
            })
        };

        let record = Self {
            data_length: len,
            discriminator,
            config_address: address("configAddress", CONFIG_OFFSET)?,
            creator_address: address("creatorAddress", CREATOR_OFFSET)?,
            base_mint_address: address("baseMintAddress", BASE_MINT_OFFSET)?,
            base_vault_address: address("baseVaultAddress", BASE_VAULT_OFFSET)?,
            quote_vault_address: address("quoteVaultAddress", QUOTE_VAULT_OFFSET)?,
            base_reserve: reserve(BASE_RESERVE_OFFSET, BASE_DECIMALS)?,
            quote_reserve: reserve(QUOTE_RESERVE_OFFSET, NATIVE_DECIMALS)?,
        };

        debug!(
            "Decoded pool state: {} bytes, config {:?}",
            record.data_length,
            record.config()
        );
        Ok(record)
    }

    /// Address of the config account this pool was launched from
    pub fn config(&self) -> Option<&str> {
        self.config_address
            .as_ref()
            .and_then(|field| field.value.as_address())
    }
}
