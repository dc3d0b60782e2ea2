//! Private key derivation from a mnemonic.
//!
//! Two modes exist:
//!
//! - [`DerivationMode::Legacy`] takes `HMAC-SHA512("Bitcoin seed", seed)` and
//!   keeps the first 32 bytes. This is the BIP32 master key, not the key at
//!   the requested path; the path is accepted and ignored. Addresses created
//!   by earlier Decimal SDK releases depend on this, so it is the default.
//! - [`DerivationMode::Bip44`] derives `m/44'/60'/0'/0/{index}` through
//!   [`kobe_eth`], giving the same address as standard Ethereum wallets.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use tracing::debug;

use super::keys::PrivateKey;
use super::mnemonic::{Seed, derive_seed, open_wallet};
use crate::error::{Error, Result};

/// HMAC key of the legacy derivation.
pub const LEGACY_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Derivation path reported by the legacy mode.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// How a private key is obtained from a mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DerivationMode {
    /// Single-step HMAC master key; `path` is recorded but not applied.
    Legacy {
        /// Derivation path supplied by the caller.
        path: String,
    },
    /// Standard BIP32/BIP44 Ethereum path at the given address index.
    Bip44 {
        /// Address index (last path component).
        index: u32,
    },
}

impl Default for DerivationMode {
    fn default() -> Self {
        Self::Legacy {
            path: DEFAULT_DERIVATION_PATH.into(),
        }
    }
}

/// Derive the legacy private key of a seed.
///
/// # Errors
///
/// Returns [`Error::InvalidPrivateKey`] in the (negligible) case that the MAC
/// output is not a valid secp256k1 scalar.
pub fn derive_private_key(seed: &Seed) -> Result<PrivateKey> {
    let mut mac = Hmac::<Sha512>::new_from_slice(LEGACY_HMAC_KEY)
        .map_err(|e| Error::InvalidPrivateKey(e.to_string()))?;
    mac.update(seed.as_bytes());
    let output = mac.finalize().into_bytes();

    let mut key = [0u8; 32];
    key.copy_from_slice(&output[..32]);
    let result = PrivateKey::from_bytes(&key);
    zeroize::Zeroize::zeroize(&mut key);
    result
}

/// Validate a mnemonic and derive its private key.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if the phrase does not validate, or a
/// derivation error from the selected mode.
pub fn private_key_from_mnemonic(
    phrase: &str,
    passphrase: Option<&str>,
    mode: &DerivationMode,
) -> Result<PrivateKey> {
    match mode {
        DerivationMode::Legacy { path } => {
            debug!(path = %path, "deriving legacy master key, path not applied");
            let seed = derive_seed(phrase, passphrase)?;
            derive_private_key(&seed)
        }
        DerivationMode::Bip44 { index } => {
            let wallet = open_wallet(phrase, passphrase)?;
            let deriver = kobe_eth::Deriver::new(&wallet);
            let derived = deriver
                .derive(*index)
                .map_err(|e| Error::InvalidPrivateKey(format!("key derivation failed: {e}")))?;
            PrivateKey::from_hex(&derived.private_key_hex)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::address::to_checksum;
    use crate::wallet::keys::is_valid_private_key;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                                 abandon abandon abandon abandon abandon about";

    #[test]
    fn test_legacy_key_known_vector() {
        let key =
            private_key_from_mnemonic(TEST_MNEMONIC, None, &DerivationMode::default()).unwrap();
        assert_eq!(
            key.to_hex(),
            "1837c1be8e2995ec11cda2b066151be2cfb48adf9e47b151d46adab3a21cdf67"
        );
        assert!(is_valid_private_key(&key.to_hex()));
        assert_eq!(
            to_checksum(&key.address()),
            "0xa8E070649A1D98651D281FdD428BD3EeC0d279e0"
        );
    }

    #[test]
    fn test_legacy_ignores_path() {
        let a = private_key_from_mnemonic(TEST_MNEMONIC, None, &DerivationMode::default()).unwrap();
        let b = private_key_from_mnemonic(
            TEST_MNEMONIC,
            None,
            &DerivationMode::Legacy {
                path: "m/44'/60'/0'/0/7".into(),
            },
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        for mode in [DerivationMode::default(), DerivationMode::Bip44 { index: 0 }] {
            let a = private_key_from_mnemonic(TEST_MNEMONIC, None, &mode).unwrap();
            let b = private_key_from_mnemonic(TEST_MNEMONIC, None, &mode).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_bip44_known_address() {
        // Well-known first account of the abandon...about phrase.
        let key =
            private_key_from_mnemonic(TEST_MNEMONIC, None, &DerivationMode::Bip44 { index: 0 })
                .unwrap();
        assert_eq!(
            to_checksum(&key.address()),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }

    #[test]
    fn test_modes_differ() {
        let legacy =
            private_key_from_mnemonic(TEST_MNEMONIC, None, &DerivationMode::default()).unwrap();
        let bip44 =
            private_key_from_mnemonic(TEST_MNEMONIC, None, &DerivationMode::Bip44 { index: 0 })
                .unwrap();
        assert_ne!(legacy, bip44);
    }

    #[test]
    fn test_invalid_mnemonic_fails() {
        let err =
            private_key_from_mnemonic("invalid seed phrase", None, &DerivationMode::default())
                .unwrap_err();
        assert!(matches!(err, Error::InvalidMnemonic(_)));
    }
}
