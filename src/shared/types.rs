//! Common types used across the application

use serde::Serialize;
use serde_json::Value;

use crate::shared::errors::DecodeError;

/// Interpreted value of a decoded field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Address(String),
    UInt(u64),
    Hex(String),
}

impl FieldValue {
    /// Bare JSON value, without the type tag
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Address(text) | FieldValue::Hex(text) => Value::String(text.clone()),
            FieldValue::UInt(value) => Value::from(*value),
        }
    }

    pub fn as_address(&self) -> Option<&str> {
        match self {
            FieldValue::Address(address) => Some(address),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            FieldValue::UInt(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_hex(&self) -> Option<&str> {
        match self {
            FieldValue::Hex(hex) => Some(hex),
            _ => None,
        }
    }
}

/// A named value extracted at a fixed byte offset.
///
/// Built only through `AccountReader`, so `offset + length` never
/// exceeds the source buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedField {
    pub name: String,
    pub offset: usize,
    pub length: usize,
    pub raw_hex: String,
    pub value: FieldValue,
}

/// Raw integer amount together with its human-scaled form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledAmount {
    pub raw: u64,
    pub decimals: u8,
    pub ui: f64,
}

impl ScaledAmount {
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self {
            raw,
            decimals,
            ui: crate::shared::utils::scale_amount(raw, decimals),
        }
    }
}

/// Decode result for one fetched account
#[derive(Debug, Clone)]
pub struct AccountRecord<R> {
    pub address: String,
    pub owner: String,
    pub data_length: usize,
    pub decoded: Result<R, DecodeError>,
}

impl<R> AccountRecord<R> {
    pub fn record(&self) -> Option<&R> {
        self.decoded.as_ref().ok()
    }

    pub fn error_message(&self) -> Option<String> {
        self.decoded.as_ref().err().map(|e| e.to_string())
    }
}
