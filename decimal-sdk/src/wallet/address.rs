//! Account addresses and their checksummed text form.

use alloy::primitives::{Address, hex, keccak256};

use super::keys::{PublicKey, strip_hex_prefix};
use crate::error::{Error, Result};

/// Derive the address of an uncompressed public key.
///
/// The address is the last 20 bytes of `keccak256(x ‖ y)`.
#[must_use]
pub fn to_address(public_key: &PublicKey) -> Address {
    let hash = keccak256(public_key.as_bytes());
    Address::from_slice(&hash[12..])
}

/// Render an address as `0x` + 40 hex digits with mixed-case checksum.
///
/// Hex digit `i` is uppercased iff nibble `i` of `keccak256(lowercase_hex)`
/// is at least 8.
#[must_use]
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_slice());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Check an address string.
///
/// Accepts `0x` + 40 hex digits that are either all lowercase, all
/// uppercase, or exactly the checksummed form.
#[must_use]
pub fn is_valid_address(s: &str) -> bool {
    parse_address(s).is_ok()
}

/// Parse an address string under the rules of [`is_valid_address`].
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] if the string is malformed or carries
/// a wrong mixed-case checksum.
pub fn parse_address(s: &str) -> Result<Address> {
    let Some(digits) = s.strip_prefix("0x") else {
        return Err(Error::InvalidAddress(format!("{s:?} is missing the 0x prefix")));
    };
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(format!(
            "{s:?} is not 40 hex characters"
        )));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(strip_hex_prefix(s), &mut bytes)
        .map_err(|e| Error::InvalidAddress(e.to_string()))?;
    let address = Address::from(bytes);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address) != s {
        return Err(Error::InvalidAddress(format!("{s:?} has a bad checksum")));
    }
    Ok(address)
}
