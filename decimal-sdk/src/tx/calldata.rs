//! ABI call data for the token calls the SDK makes.
//!
//! Every argument is one 32-byte word (left padded), except the dynamic
//! `string` of `tokens(string)` which uses the standard offset/length/data
//! layout.

use alloy::primitives::{Address, Bytes, U256, keccak256};

use crate::error::{Error, Result};

/// `keccak256("transfer(address,uint256)")[..4]`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `keccak256("decimals()")[..4]`.
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// `keccak256("balanceOf(address)")[..4]`.
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `keccak256("tokens(string)")[..4]`, the token registry lookup.
pub const TOKENS_SELECTOR: [u8; 4] = [0x04, 0xc2, 0x32, 0x0b];

const WORD: usize = 32;

/// Compute the 4-byte selector of a function signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Call data for `transfer(to, amount)`.
///
/// `amount` must already be scaled to the token's base units.
#[must_use]
pub fn encode_transfer_call(to: Address, amount: U256) -> Bytes {
    let mut out = Vec::with_capacity(4 + 2 * WORD);
    out.extend_from_slice(&TRANSFER_SELECTOR);
    push_address(&mut out, to);
    out.extend_from_slice(&amount.to_be_bytes::<32>());
    out.into()
}

/// Call data for `decimals()`.
#[must_use]
pub fn encode_decimals_call() -> Bytes {
    Bytes::copy_from_slice(&DECIMALS_SELECTOR)
}

/// Call data for `balanceOf(owner)`.
#[must_use]
pub fn encode_balance_of_call(owner: Address) -> Bytes {
    let mut out = Vec::with_capacity(4 + WORD);
    out.extend_from_slice(&BALANCE_OF_SELECTOR);
    push_address(&mut out, owner);
    out.into()
}

/// Call data for the registry's `tokens(symbol)`.
#[must_use]
pub fn encode_tokens_call(symbol: &str) -> Bytes {
    let data = symbol.as_bytes();
    let padded = data.len().div_ceil(WORD) * WORD;

    let mut out = Vec::with_capacity(4 + 2 * WORD + padded);
    out.extend_from_slice(&TOKENS_SELECTOR);
    out.extend_from_slice(&U256::from(WORD).to_be_bytes::<32>());
    out.extend_from_slice(&U256::from(data.len()).to_be_bytes::<32>());
    out.extend_from_slice(data);
    out.resize(4 + 2 * WORD + padded, 0);
    out.into()
}

/// Decode an `address` return value.
///
/// # Errors
///
/// Returns [`Error::Rpc`] if fewer than 32 bytes were returned.
pub fn decode_address_word(data: &[u8]) -> Result<Address> {
    let word = first_word(data)?;
    Ok(Address::from_slice(&word[12..]))
}

/// Decode a `uint` return value.
///
/// # Errors
///
/// Returns [`Error::Rpc`] if fewer than 32 bytes were returned.
pub fn decode_uint_word(data: &[u8]) -> Result<U256> {
    let word = first_word(data)?;
    Ok(U256::from_be_slice(word))
}

fn push_address(out: &mut Vec<u8>, address: Address) {
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(address.as_slice());
}

fn first_word(data: &[u8]) -> Result<&[u8]> {
    data.get(..WORD).ok_or_else(|| {
        Error::rpc(
            "eth_call",
            format!("expected a 32-byte return word, got {} bytes", data.len()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(selector("transfer(address,uint256)"), TRANSFER_SELECTOR);
        assert_eq!(selector("decimals()"), DECIMALS_SELECTOR);
        assert_eq!(selector("balanceOf(address)"), BALANCE_OF_SELECTOR);
        assert_eq!(selector("tokens(string)"), TOKENS_SELECTOR);
    }

    #[test]
    fn test_transfer_call_golden() {
        let to: Address = "0x40900a48273644768c09183e00e43528c17a29f6".parse().unwrap();
        let amount = U256::from(11u64) * U256::from(10u64).pow(U256::from(18u64));
        let data = encode_transfer_call(to, amount);
        assert_eq!(
            hex::encode(&data),
            "a9059cbb\
             00000000000000000000000040900a48273644768c09183e00e43528c17a29f6\
             00000000000000000000000000000000000000000000000098a7d9b8314c0000"
        );
        assert_eq!(data.len(), 68);
    }

    #[test]
    fn test_transfer_call_zero_amount() {
        let data = encode_transfer_call(Address::ZERO, U256::ZERO);
        assert_eq!(&data[..4], &TRANSFER_SELECTOR);
        assert!(data[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_balance_of_call() {
        let owner: Address = "0xa8e070649a1d98651d281fdd428bd3eec0d279e0".parse().unwrap();
        assert_eq!(
            hex::encode(encode_balance_of_call(owner)),
            "70a08231000000000000000000000000a8e070649a1d98651d281fdd428bd3eec0d279e0"
        );
        assert_eq!(hex::encode(encode_decimals_call()), "313ce567");
    }

    #[test]
    fn test_tokens_call_string_layout() {
        assert_eq!(
            hex::encode(encode_tokens_call("fridaycoin")),
            "04c2320b\
             0000000000000000000000000000000000000000000000000000000000000020\
             000000000000000000000000000000000000000000000000000000000000000a\
             667269646179636f696e00000000000000000000000000000000000000000000"
        );
        // Empty string: offset and zero length, no data words.
        assert_eq!(encode_tokens_call("").len(), 4 + 64);
    }

    #[test]
    fn test_decode_words() {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&[0x11; 20]);
        assert_eq!(decode_address_word(&word).unwrap(), Address::repeat_byte(0x11));

        let mut word = [0u8; 32];
        word[31] = 18;
        assert_eq!(decode_uint_word(&word).unwrap(), U256::from(18u64));

        assert!(matches!(
            decode_uint_word(&[0u8; 4]),
            Err(Error::Rpc { method: "eth_call", .. })
        ));
    }
}
