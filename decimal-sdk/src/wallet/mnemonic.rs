//! BIP39 mnemonic validation and seed derivation.
//!
//! Wordlist lookup and checksum verification are delegated to [`kobe`];
//! this module adds the word-count contract and a zeroizing [`Seed`] type.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Word counts accepted for a mnemonic.
pub const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Word count used when generating a new mnemonic.
pub const DEFAULT_WORD_COUNT: usize = 24;

/// A 64-byte BIP39 seed. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// The raw seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl From<[u8; 64]> for Seed {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// Whether `phrase` is an acceptable mnemonic. Never panics.
#[must_use]
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    validate_mnemonic(phrase).is_ok()
}

/// Validate word count and checksum of a mnemonic.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if the phrase is empty, has an
/// unsupported number of words, contains non-lowercase words, or fails the
/// BIP39 checksum.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    open_wallet(phrase, None).map(|_| ())
}

/// Derive the BIP39 seed of a mnemonic.
///
/// An absent passphrase is the empty passphrase. No derivation path is
/// involved.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if the phrase does not validate.
pub fn derive_seed(phrase: &str, passphrase: Option<&str>) -> Result<Seed> {
    let wallet = open_wallet(phrase, passphrase)?;
    Ok(Seed(*wallet.seed()))
}

/// Normalise, check and open a mnemonic with kobe.
pub(crate) fn open_wallet(phrase: &str, passphrase: Option<&str>) -> Result<kobe::Wallet> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if words.is_empty() {
        return Err(Error::InvalidMnemonic("mnemonic is empty".into()));
    }
    if !SUPPORTED_WORD_COUNTS.contains(&words.len()) {
        return Err(Error::InvalidMnemonic(format!(
            "unsupported word count {}",
            words.len()
        )));
    }
    if words
        .iter()
        .any(|w| !w.chars().all(|c| c.is_ascii_lowercase()))
    {
        return Err(Error::InvalidMnemonic(
            "words must be lowercase letters".into(),
        ));
    }

    kobe::Wallet::from_mnemonic(&words.join(" "), passphrase)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                                 abandon abandon abandon abandon abandon about";

    #[test]
    fn test_is_valid_mnemonic() {
        assert!(is_valid_mnemonic(TEST_MNEMONIC));

        assert!(!is_valid_mnemonic("invalid seed phrase"));
        assert!(!is_valid_mnemonic(""));
        assert!(!is_valid_mnemonic("   "));
        assert!(!is_valid_mnemonic("abandon abandon"));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let phrase = "abandon ".repeat(11) + "abandon";
        assert!(matches!(
            validate_mnemonic(&phrase),
            Err(Error::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_uppercase_rejected() {
        let phrase = TEST_MNEMONIC.to_uppercase();
        assert!(!is_valid_mnemonic(&phrase));
    }

    #[test]
    fn test_derive_seed_known_vector() {
        let seed = derive_seed(TEST_MNEMONIC, None).unwrap();
        assert_eq!(
            alloy::primitives::hex::encode(seed.as_bytes()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_derive_seed_normalises_whitespace() {
        let spaced = TEST_MNEMONIC.replace(' ', "  ");
        let a = derive_seed(TEST_MNEMONIC, None).unwrap();
        let b = derive_seed(&format!(" {spaced}\n"), None).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let plain = derive_seed(TEST_MNEMONIC, None).unwrap();
        let salted = derive_seed(TEST_MNEMONIC, Some("TREZOR")).unwrap();
        assert_ne!(plain.as_bytes(), salted.as_bytes());
    }
}
