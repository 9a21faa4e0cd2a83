//! Range-checked little-endian reads over raw account data

use std::collections::BTreeMap;

use crate::codec::base58;
use crate::shared::errors::ReadError;
use crate::shared::types::{DecodedField, FieldValue};

/// Size of an account address in bytes
pub const ADDRESS_LEN: usize = 32;

/// Read-only cursor over one account's data.
///
/// Every read checks its full span against the buffer and fails with
/// `ReadError::OutOfRange` instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct AccountReader<'a> {
    data: &'a [u8],
}

impl<'a> AccountReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], ReadError> {
        let out_of_range = ReadError::OutOfRange {
            offset,
            len,
            data_len: self.data.len(),
        };
        let end = offset.checked_add(len).ok_or_else(|| out_of_range.clone())?;
        self.data.get(offset..end).ok_or(out_of_range)
    }

    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ReadError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(offset, N)?);
        Ok(array)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ReadError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    pub fn read_u16_le(&self, offset: usize) -> Result<u16, ReadError> {
        self.read_array::<2>(offset).map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&self, offset: usize) -> Result<u32, ReadError> {
        self.read_array::<4>(offset).map(u32::from_le_bytes)
    }

    pub fn read_u64_le(&self, offset: usize) -> Result<u64, ReadError> {
        self.read_array::<8>(offset).map(u64::from_le_bytes)
    }

    /// Lowercase hex of `[offset, end)`, or to the end of the buffer when
    /// `end` is `None`
    pub fn read_hex(&self, offset: usize, end: Option<usize>) -> Result<String, ReadError> {
        let end = end.unwrap_or(self.data.len());
        let len = end.checked_sub(offset).ok_or(ReadError::OutOfRange {
            offset,
            len: 0,
            data_len: self.data.len(),
        })?;
        self.read_bytes(offset, len).map(hex::encode)
    }

    /// Base58 text of `len` bytes at `offset`
    pub fn read_base58_address(&self, offset: usize, len: usize) -> Result<String, ReadError> {
        self.read_bytes(offset, len).map(base58::encode)
    }

    /// Base58 text of a 32-byte address at `offset`
    pub fn read_address(&self, offset: usize) -> Result<String, ReadError> {
        self.read_base58_address(offset, ADDRESS_LEN)
    }

    /// First byte offset whose u64LE equals `value`
    pub fn find_u64(&self, value: u64) -> Option<usize> {
        let needle = value.to_le_bytes();
        self.data
            .windows(needle.len())
            .position(|window| window == needle)
    }

    pub fn address_field(&self, name: &str, offset: usize) -> Result<DecodedField, ReadError> {
        let bytes = self.read_bytes(offset, ADDRESS_LEN)?;
        Ok(DecodedField {
            name: name.to_string(),
            offset,
            length: ADDRESS_LEN,
            raw_hex: hex::encode(bytes),
            value: FieldValue::Address(base58::encode(bytes)),
        })
    }

    pub fn u8_field(&self, name: &str, offset: usize) -> Result<DecodedField, ReadError> {
        let value = self.read_u8(offset)?;
        Ok(DecodedField {
            name: name.to_string(),
            offset,
            length: 1,
            raw_hex: format!("{:02x}", value),
            value: FieldValue::UInt(value as u64),
        })
    }

    /// Opaque bytes `[start, end)` kept as hex
    pub fn hex_field(&self, name: &str, start: usize, end: usize) -> Result<DecodedField, ReadError> {
        let raw_hex = self.read_hex(start, Some(end))?;
        Ok(DecodedField {
            name: name.to_string(),
            offset: start,
            length: end - start,
            value: FieldValue::Hex(raw_hex.clone()),
            raw_hex,
        })
    }
}

/// Sweep `offsets`, keeping every value `read` produces that `keep`
/// accepts. Offsets whose read fails are skipped.
pub fn scan_candidates<T, R, P>(
    offsets: impl IntoIterator<Item = usize>,
    read: R,
    keep: P,
) -> BTreeMap<usize, T>
where
    R: Fn(usize) -> Result<T, ReadError>,
    P: Fn(&T) -> bool,
{
    offsets
        .into_iter()
        .filter_map(|offset| read(offset).ok().map(|value| (offset, value)))
        .filter(|(_, value)| keep(value))
        .collect()
}
