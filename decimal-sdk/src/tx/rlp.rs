//! Flat RLP encoding.
//!
//! Only what a legacy transaction needs: a single list of byte strings and
//! unsigned integers. Nested lists and decoding are not supported.

use alloy::primitives::{Address, Bytes, U256};

/// One item of a flat RLP list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A raw byte string, encoded as is.
    Bytes(Vec<u8>),
    /// An unsigned integer, encoded big-endian without leading zeros.
    Uint(U256),
}

impl Field {
    /// Append the RLP string encoding of this item to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(bytes) => encode_bytes(bytes, out),
            Self::Uint(value) => {
                let be = value.to_be_bytes_trimmed_vec();
                encode_bytes(&be, out);
            }
        }
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<u128> for Field {
    fn from(value: u128) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<U256> for Field {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<Address> for Field {
    fn from(address: Address) -> Self {
        Self::Bytes(address.to_vec())
    }
}

impl From<&Bytes> for Field {
    fn from(bytes: &Bytes) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<&[u8]> for Field {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Encode a flat list: each item as an RLP string, wrapped in one list header.
#[must_use]
pub fn encode_list(fields: &[Field]) -> Vec<u8> {
    let mut payload = Vec::new();
    for field in fields {
        field.encode(&mut payload);
    }

    let mut out = Vec::with_capacity(payload.len() + 9);
    encode_header(0xc0, 0xf7, payload.len(), &mut out);
    out.extend_from_slice(&payload);
    out
}

/// Append the RLP string encoding of `bytes` to `out`.
///
/// A single byte below `0x80` is its own encoding; the empty string is
/// `0x80`.
pub fn encode_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    match bytes {
        [b] if *b < 0x80 => out.push(*b),
        _ => {
            encode_header(0x80, 0xb7, bytes.len(), out);
            out.extend_from_slice(bytes);
        }
    }
}

/// Short form `short + len` up to 55 bytes, else `long + len(len)` and `len`.
fn encode_header(short: u8, long: u8, len: usize, out: &mut Vec<u8>) {
    if len <= 55 {
        // len <= 55 fits in the low bits of the tag.
        #[allow(clippy::cast_possible_truncation)]
        out.push(short + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let skip = len_bytes.iter().take_while(|b| **b == 0).count();
        let len_be = &len_bytes[skip..];
        #[allow(clippy::cast_possible_truncation)]
        out.push(long + len_be.len() as u8);
        out.extend_from_slice(len_be);
    }
}
