//! Byte-level codecs: base58 addresses and fixed-width account reads

pub mod base58;
pub mod reader;

pub use reader::{scan_candidates, AccountReader, ADDRESS_LEN};
