//! Base58 text encoding for account addresses

use crate::shared::errors::Base58Error;

/// Bitcoin/Solana base58 alphabet
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes as base58.
///
/// The input is treated as one unsigned big-endian integer and divided
/// by 58 until it reaches zero. Each leading zero byte becomes one
/// leading `'1'`. The result is never empty: an empty input encodes to
/// `"1"`.
pub fn encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // Remainders come out least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    let mut number: Vec<u8> = bytes[zeros..].to_vec();
    while !number.is_empty() {
        let mut remainder: u32 = 0;
        let mut quotient: Vec<u8> = Vec::with_capacity(number.len());
        for &byte in &number {
            let acc = (remainder << 8) | byte as u32;
            let q = acc / 58;
            remainder = acc % 58;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q as u8);
            }
        }
        digits.push(ALPHABET[remainder as usize]);
        number = quotient;
    }

    let mut encoded = String::with_capacity(zeros + digits.len());
    encoded.extend(std::iter::repeat('1').take(zeros));
    encoded.extend(digits.iter().rev().map(|&d| d as char));

    if encoded.is_empty() {
        encoded.push('1');
    }
    encoded
}

/// Decode base58 text back into bytes.
///
/// Leading `'1'` characters become leading zero bytes.
pub fn decode(text: &str) -> Result<Vec<u8>, Base58Error> {
    // Accumulated little-endian
    let mut bytes: Vec<u8> = Vec::with_capacity(text.len() * 733 / 1000 + 1);

    for (index, character) in text.chars().enumerate() {
        let value = digit_value(character)
            .ok_or(Base58Error::InvalidCharacter { character, index })?;

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let zeros = text.chars().take_while(|&c| c == '1').count();
    bytes.extend(std::iter::repeat(0).take(zeros));
    bytes.reverse();
    Ok(bytes)
}

fn digit_value(character: char) -> Option<u8> {
    if !character.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&c| c == character as u8)
        .map(|position| position as u8)
}
