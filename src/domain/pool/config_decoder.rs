//! Pool config account decoder
//!
//! Offsets are inferred from observed config accounts, not taken from a
//! published schema. Fixed-offset reads are kept apart from the scanned
//! candidate maps, which only list offsets that *could* hold a value of
//! the expected shape.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::codec::{scan_candidates, AccountReader};
use crate::shared::errors::{DecodeError, ReadError};
use crate::shared::types::DecodedField;
use crate::shared::utils::{scale_amount, NATIVE_DECIMALS};

pub const DISCRIMINATOR_LEN: usize = 8;
pub const FEE_CLAIMER_OFFSET: usize = 40;
pub const LEFTOVER_RECEIVER_OFFSET: usize = 72;
pub const QUOTE_MINT_OFFSET: usize = 104;
pub const ENUM_BLOCK_OFFSET: usize = 136;

/// Single-byte enum fields stored back to back from `ENUM_BLOCK_OFFSET`
pub const ENUM_FIELDS: [&str; 6] = [
    "tokenDecimal",
    "tokenType",
    "activationType",
    "collectFeeMode",
    "migrationOption",
    "tokenUpdateAuthority",
];

const SCAN_START: usize = 142;
const PERCENTAGE_SCAN_END: usize = 200;
const MAX_BPS: u16 = 10_000;
const MIGRATION_OPTION_SCAN_END: usize = 280;
const MAX_MIGRATION_FEE_OPTION: u8 = 6;

/// 85 SOL in lamports, used as a layout signature
pub const MIGRATION_QUOTE_THRESHOLD_LAMPORTS: u64 = 85_000_000_000;

const FEE_SECTION: (usize, usize) = (8, 40);
const MIGRATION_SECTION: (usize, usize) = (200, 280);
const CURVE_DATA_START: (usize, usize) = (300, 400);

/// Fixed windows over the region after the quote mint, diffed byte for byte
pub const LAYOUT_WINDOWS: [(&str, usize, usize); 6] = [
    ("bytes136to150", 136, 150),
    ("bytes150to168", 150, 168),
    ("bytes168to200", 168, 200),
    ("bytes200to232", 200, 232),
    ("bytes232to264", 232, 264),
    ("bytes264to296", 264, 296),
];

/// Decoded bonding-curve pool config account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolConfigRecord {
    pub data_length: usize,
    pub discriminator: DecodedField,

    pub fee_claimer: Option<DecodedField>,
    pub fee_claimer_hex: Option<DecodedField>,
    pub leftover_receiver: Option<DecodedField>,
    pub quote_mint: Option<DecodedField>,

    pub token_decimal: Option<DecodedField>,
    pub token_type: Option<DecodedField>,
    pub activation_type: Option<DecodedField>,
    pub collect_fee_mode: Option<DecodedField>,
    pub migration_option: Option<DecodedField>,
    pub token_update_authority: Option<DecodedField>,

    /// Even offsets whose u16LE looks like a basis-point value
    pub possible_percentage_fields: BTreeMap<usize, u16>,
    /// Offsets whose byte looks like a small enum
    pub possible_migration_fee_options: BTreeMap<usize, u8>,

    pub migration_quote_threshold_offset: Option<usize>,
    #[serde(rename = "migrationQuoteThresholdSOL")]
    pub migration_quote_threshold_sol: Option<f64>,

    pub fee_section: Option<DecodedField>,
    pub migration_section: Option<DecodedField>,
    pub curve_data_start: Option<DecodedField>,
    pub layout_windows: BTreeMap<String, DecodedField>,
}

impl PoolConfigRecord {
    /// Decode a config account.
    ///
    /// Fields past the end of a short account are left empty; only a
    /// failed unconditional read (the discriminator) fails the decode.
    pub fn try_decode(data: &[u8]) -> Result<Self, DecodeError> {
        let reader = AccountReader::new(data);
        let len = reader.len();

        let discriminator = reader.hex_field("discriminator", 0, DISCRIMINATOR_LEN)?;

        let fee_claimer = gated(len >= FEE_CLAIMER_OFFSET + 32, || {
            reader.address_field("feeClaimer", FEE_CLAIMER_OFFSET)
        })?;
        let fee_claimer_hex = gated(len >= FEE_CLAIMER_OFFSET + 32, || {
            reader.hex_field("feeClaimerHex", FEE_CLAIMER_OFFSET, FEE_CLAIMER_OFFSET + 32)
        })?;
        let leftover_receiver = gated(len >= LEFTOVER_RECEIVER_OFFSET + 32, || {
            reader.address_field("leftoverReceiver", LEFTOVER_RECEIVER_OFFSET)
        })?;
        let quote_mint = gated(len >= QUOTE_MINT_OFFSET + 32, || {
            reader.address_field("quoteMint", QUOTE_MINT_OFFSET)
        })?;

        let enum_field = |index: usize| {
            gated(len > SCAN_START, || {
                reader.u8_field(ENUM_FIELDS[index], ENUM_BLOCK_OFFSET + index)
            })
        };

        let possible_percentage_fields = scan_candidates(
            (SCAN_START..len.saturating_sub(2).min(PERCENTAGE_SCAN_END)).step_by(2),
            |offset| reader.read_u16_le(offset),
            |value| *value > 0 && *value <= MAX_BPS,
        );
        let possible_migration_fee_options = scan_candidates(
            SCAN_START..len.min(MIGRATION_OPTION_SCAN_END),
            |offset| reader.read_u8(offset),
            |value| *value <= MAX_MIGRATION_FEE_OPTION,
        );

        let migration_quote_threshold_offset = reader.find_u64(MIGRATION_QUOTE_THRESHOLD_LAMPORTS);
        let migration_quote_threshold_sol = migration_quote_threshold_offset
            .map(|_| scale_amount(MIGRATION_QUOTE_THRESHOLD_LAMPORTS, NATIVE_DECIMALS));

        let window = |name: &str, (start, end): (usize, usize)| reader.hex_field(name, start, end).ok();
        let layout_windows = LAYOUT_WINDOWS
            .iter()
            .filter_map(|&(name, start, end)| {
                window(name, (start, end)).map(|field| (name.to_string(), field))
            })
            .collect();

        let record = Self {
            data_length: len,
            discriminator,
            fee_claimer,
            fee_claimer_hex,
            leftover_receiver,
            quote_mint,
            token_decimal: enum_field(0)?,
            token_type: enum_field(1)?,
            activation_type: enum_field(2)?,
            collect_fee_mode: enum_field(3)?,
            migration_option: enum_field(4)?,
            token_update_authority: enum_field(5)?,
            possible_percentage_fields,
            possible_migration_fee_options,
            migration_quote_threshold_offset,
            migration_quote_threshold_sol,
            fee_section: window("feeSection", FEE_SECTION),
            migration_section: window("migrationSection", MIGRATION_SECTION),
            curve_data_start: window("curveDataStart", CURVE_DATA_START),
            layout_windows,
        };

        debug!(
            "Decoded pool config: {} bytes, discriminator {}, {} percentage candidates, threshold at {:?}",
            record.data_length,
            record.discriminator.raw_hex,
            record.possible_percentage_fields.len(),
            record.migration_quote_threshold_offset
        );
        Ok(record)
    }

    pub fn fee_claimer_address(&self) -> Option<&str> {
        self.fee_claimer.as_ref().and_then(|field| field.value.as_address())
    }

    pub fn leftover_receiver_address(&self) -> Option<&str> {
        self.leftover_receiver.as_ref().and_then(|field| field.value.as_address())
    }

    pub fn quote_mint_address(&self) -> Option<&str> {
        self.quote_mint.as_ref().and_then(|field| field.value.as_address())
    }

    pub fn fee_section_hex(&self) -> Option<&str> {
        self.fee_section.as_ref().and_then(|field| field.value.as_hex())
    }

    pub fn layout_window_hex(&self, name: &str) -> Option<&str> {
        self.layout_windows.get(name).and_then(|field| field.value.as_hex())
    }

    pub fn activation_type_value(&self) -> Option<u64> {
        self.activation_type.as_ref().and_then(|field| field.value.as_uint())
    }

    /// `None` when either address is absent
    pub fn fee_claimer_is_leftover_receiver(&self) -> Option<bool> {
        Some(self.fee_claimer_address()? == self.leftover_receiver_address()?)
    }
}

/// Run `read` only when the account is long enough for it
pub(crate) fn gated<T>(
    present: bool,
    read: impl FnOnce() -> Result<T, ReadError>,
) -> Result<Option<T>, ReadError> {
    present.then(read).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::base58;
    use crate::shared::types::FieldValue;

    fn config_buffer(len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        for (i, byte) in data.iter_mut().enumerate().take(136.min(len)) {
            *byte = (i % 251) as u8 + 1;
        }
        data
    }

    #[test]
    fn test_short_buffer_keeps_discriminator() {
        let data = config_buffer(50);
        let record = PoolConfigRecord::try_decode(&data).unwrap();
        assert_eq!(record.data_length, 50);
        assert_eq!(record.discriminator.raw_hex, "0102030405060708");
        assert_eq!(record.discriminator.length, 8);
        assert!(record.fee_claimer.is_none());
        assert!(record.fee_claimer_hex.is_none());
        assert!(record.leftover_receiver.is_none());
        assert!(record.activation_type.is_none());
        assert!(record.possible_percentage_fields.is_empty());
        assert!(record.possible_migration_fee_options.is_empty());
        assert!(record.layout_windows.is_empty());
        assert_eq!(record.fee_section_hex(), Some(&*hex::encode(&data[8..40])));
        assert!(record.migration_section.is_none());
    }

    #[test]
    fn test_buffer_without_discriminator_fails() {
        assert!(matches!(
            PoolConfigRecord::try_decode(&[1, 2, 3]),
            Err(DecodeError::Read(ReadError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_length_thresholds() {
        let record = PoolConfigRecord::try_decode(&config_buffer(72)).unwrap();
        assert!(record.fee_claimer.is_some());
        assert!(record.leftover_receiver.is_none());

        let record = PoolConfigRecord::try_decode(&config_buffer(136)).unwrap();
        assert!(record.quote_mint.is_some());
        assert!(record.token_decimal.is_none());

        // The enum block needs strictly more than 142 bytes
        let record = PoolConfigRecord::try_decode(&config_buffer(142)).unwrap();
        assert!(record.token_update_authority.is_none());
        let record = PoolConfigRecord::try_decode(&config_buffer(143)).unwrap();
        assert!(record.token_update_authority.is_some());
    }

    #[test]
    fn test_addresses_and_enum_block() {
        let mut data = config_buffer(300);
        data[136..142].copy_from_slice(&[9, 1, 0, 2, 3, 1]);
        let record = PoolConfigRecord::try_decode(&data).unwrap();

        let fee_claimer = record.fee_claimer.as_ref().unwrap();
        assert_eq!(fee_claimer.offset, 40);
        assert_eq!(fee_claimer.length, 32);
        assert_eq!(
            fee_claimer.value,
            FieldValue::Address(base58::encode(&data[40..72]))
        );
        let fee_claimer_hex = record.fee_claimer_hex.as_ref().unwrap();
        assert_eq!(fee_claimer_hex.offset, 40);
        assert_eq!(fee_claimer_hex.value, FieldValue::Hex(hex::encode(&data[40..72])));
        assert_eq!(record.leftover_receiver_address(), Some(&*base58::encode(&data[72..104])));
        assert_eq!(record.quote_mint_address(), Some(&*base58::encode(&data[104..136])));
        assert_eq!(record.fee_claimer_is_leftover_receiver(), Some(false));

        let uint = |field: &Option<DecodedField>| field.as_ref().and_then(|f| f.value.as_uint());
        assert_eq!(uint(&record.token_decimal), Some(9));
        assert_eq!(uint(&record.token_type), Some(1));
        assert_eq!(record.activation_type_value(), Some(0));
        assert_eq!(uint(&record.collect_fee_mode), Some(2));
        assert_eq!(uint(&record.migration_option), Some(3));
        assert_eq!(uint(&record.token_update_authority), Some(1));
        assert_eq!(record.activation_type.as_ref().unwrap().offset, 138);
    }

    #[test]
    fn test_candidate_scans() {
        let mut data = config_buffer(300);
        data[150..152].copy_from_slice(&500u16.to_le_bytes());
        data[160..162].copy_from_slice(&20_000u16.to_le_bytes());
        data[198..200].copy_from_slice(&10_000u16.to_le_bytes());
        data[230] = 7;

        let record = PoolConfigRecord::try_decode(&data).unwrap();

        let percentages: Vec<(usize, u16)> = record
            .possible_percentage_fields
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        assert_eq!(percentages, vec![(150, 500), (198, 10_000)]);

        let options = &record.possible_migration_fee_options;
        assert!(options.keys().all(|offset| (142..280).contains(offset)));
        assert_eq!(options.get(&151), Some(&1));
        assert!(!options.contains_key(&150));
        assert!(!options.contains_key(&230));
        assert_eq!(options.get(&279), Some(&0));
    }

    #[test]
    fn test_percentage_scan_upper_edge() {
        let mut data = config_buffer(300);
        data[196..198].copy_from_slice(&10_000u16.to_le_bytes());
        let record = PoolConfigRecord::try_decode(&data).unwrap();
        assert_eq!(record.possible_percentage_fields.get(&196), Some(&10_000));
        assert!(record.possible_percentage_fields.keys().all(|k| *k < 200 && k % 2 == 0));
    }

    #[test]
    fn test_migration_threshold_signature() {
        let mut data = config_buffer(320);
        let k = 251;
        data[k..k + 8].copy_from_slice(&MIGRATION_QUOTE_THRESHOLD_LAMPORTS.to_le_bytes());
        let record = PoolConfigRecord::try_decode(&data).unwrap();
        assert_eq!(record.migration_quote_threshold_offset, Some(251));
        assert_eq!(record.migration_quote_threshold_sol, Some(85.0));

        let record = PoolConfigRecord::try_decode(&config_buffer(320)).unwrap();
        assert_eq!(record.migration_quote_threshold_offset, None);
        assert_eq!(record.migration_quote_threshold_sol, None);
    }

    #[test]
    fn test_sections() {
        let data = config_buffer(300);
        let record = PoolConfigRecord::try_decode(&data).unwrap();
        assert_eq!(record.fee_section_hex().map(str::len), Some(64));

        let migration = record.migration_section.as_ref().unwrap();
        assert_eq!((migration.offset, migration.length), (200, 80));
        assert_eq!(migration.value, FieldValue::Hex(hex::encode(&data[200..280])));
        assert!(record.curve_data_start.is_none());

        assert_eq!(record.layout_windows.len(), 6);
        let window = &record.layout_windows["bytes136to150"];
        assert_eq!((window.offset, window.length), (136, 14));
        assert_eq!(record.layout_window_hex("bytes136to150").map(str::len), Some(28));

        let record = PoolConfigRecord::try_decode(&config_buffer(400)).unwrap();
        let curve = record.curve_data_start.as_ref().unwrap();
        assert_eq!((curve.offset, curve.length), (300, 100));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut data = config_buffer(300);
        data[90..98].copy_from_slice(&MIGRATION_QUOTE_THRESHOLD_LAMPORTS.to_le_bytes());
        let record = PoolConfigRecord::try_decode(&data).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dataLength"], 300);
        assert_eq!(json["migrationQuoteThresholdSOL"], 85.0);
        assert_eq!(json["feeClaimer"]["value"]["type"], "address");
        assert_eq!(json["activationType"]["value"]["value"], 0);
        assert!(json["possiblePercentageFields"].is_object());
        assert_eq!(json["discriminator"]["value"]["type"], "hex");
        assert_eq!(json["feeSection"]["rawHex"], hex::encode(&data[8..40]));
        assert_eq!(json["layoutWindows"]["bytes264to296"]["offset"], 264);
    }
}
