//! secp256k1 key material.

use alloy::primitives::{Address, hex};
use alloy::signers::local::PrivateKeySigner;
use k256::ecdsa::SigningKey;

use super::address::to_address;
use crate::error::{Error, Result};

/// A secp256k1 private key.
///
/// Always a valid scalar (`0 < key < n`). The key material is zeroized on
/// drop and never shown by `Debug`.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Create a key from its 32-byte big-endian representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] for zero or out-of-range scalars.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        SigningKey::from_slice(bytes).map(Self).map_err(|_| {
            Error::InvalidPrivateKey("scalar is zero or not below the curve order".into())
        })
    }

    /// Parse a hex private key, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrivateKey`] if the string is not 64 hex
    /// digits, is all zero, or is not below the curve order.
    pub fn from_hex(s: &str) -> Result<Self> {
        if !is_valid_private_key(s) {
            return Err(Error::InvalidPrivateKey(
                "expected 64 non-zero hex characters".into(),
            ));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(strip_hex_prefix(s), &mut bytes)
            .map_err(|e| Error::InvalidPrivateKey(e.to_string()))?;
        let key = Self::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        key
    }

    /// The 32 key bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Lowercase hex encoding without a `0x` prefix.
    ///
    /// **Security Warning**: Handle this value carefully.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }

    /// Derive the uncompressed public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        let point = self.0.verifying_key().to_encoded_point(false);
        let mut xy = [0u8; 64];
        // Skip the 0x04 SEC1 tag.
        xy.copy_from_slice(&point.as_bytes()[1..]);
        PublicKey(xy)
    }

    /// Derive the account address.
    #[must_use]
    pub fn address(&self) -> Address {
        to_address(&self.public_key())
    }

    /// Build an alloy signer over this key.
    #[must_use]
    pub fn signer(&self) -> PrivateKeySigner {
        PrivateKeySigner::from_signing_key(self.0.clone())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for PrivateKey {}

/// An uncompressed secp256k1 public key: `x ‖ y`, no SEC1 prefix byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    /// The 64 raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Lowercase hex encoding without a `0x` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Check that `s` is 64 hex digits (optional `0x`) and not all zero.
///
/// This is a format check only; the curve-order bound is enforced by
/// [`PrivateKey::from_hex`].
#[must_use]
pub fn is_valid_private_key(s: &str) -> bool {
    let digits = strip_hex_prefix(s);
    digits.len() == 64
        && digits.bytes().all(|b| b.is_ascii_hexdigit())
        && digits.bytes().any(|b| b != b'0')
}

pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_KEY: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

    #[test]
    fn test_is_valid_private_key() {
        assert!(is_valid_private_key(VALID_KEY));
        assert!(is_valid_private_key(&format!("0x{VALID_KEY}")));
        assert!(is_valid_private_key(&VALID_KEY.to_uppercase()));

        assert!(!is_valid_private_key("invalid_key"));
        assert!(!is_valid_private_key("0x123"));
        assert!(!is_valid_private_key(""));
        assert!(!is_valid_private_key("0x"));
        assert!(!is_valid_private_key(&"0".repeat(64)));
        assert!(!is_valid_private_key(&format!("0x{}", "0".repeat(64))));
        assert!(!is_valid_private_key(&format!("{VALID_KEY}00")));
        assert!(!is_valid_private_key(&format!("{}zz", &VALID_KEY[..62])));
    }

    #[test]
    fn test_from_hex_rejects_curve_order() {
        let n = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
        assert!(is_valid_private_key(n));
        assert!(matches!(
            PrivateKey::from_hex(n),
            Err(Error::InvalidPrivateKey(_))
        ));
    }

    #[test]
    fn test_hex_round_trip() {
        let key = PrivateKey::from_hex(&format!("0x{VALID_KEY}")).unwrap();
        assert_eq!(key.to_hex(), VALID_KEY);
        assert_eq!(PrivateKey::from_bytes(&key.to_bytes()).unwrap(), key);
    }

    #[test]
    fn test_public_key_of_one() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        let key = PrivateKey::from_bytes(&bytes).unwrap();
        assert_eq!(
            key.public_key().to_hex(),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
    }

    #[test]
    fn test_address_matches_alloy_signer() {
        let key = PrivateKey::from_hex(VALID_KEY).unwrap();
        assert_eq!(key.address(), key.signer().address());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = PrivateKey::from_hex(VALID_KEY).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("1234567890"));
        assert!(rendered.contains("REDACTED"));
    }
}
