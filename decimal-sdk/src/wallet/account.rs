//! Sending accounts.
//!
//! An [`Account`] bundles a private key with its derived public key and
//! address. Build one with [`Account::builder`] from either a mnemonic or a
//! raw private key.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::info;

use super::address::to_checksum;
use super::derivation::{DerivationMode, private_key_from_mnemonic};
use super::keys::{PrivateKey, PublicKey};
use super::mnemonic::{SUPPORTED_WORD_COUNTS, validate_mnemonic};
use crate::error::{Error, Result};

/// Builder for constructing an [`Account`].
///
/// # Examples
///
/// ```rust,ignore
/// // From a mnemonic, legacy derivation
/// let account = Account::builder()
///     .mnemonic("abandon abandon ...")
///     .build()?;
///
/// // From a private key
/// let account = Account::builder()
///     .private_key("0xabc...")
///     .build()?;
/// ```
#[derive(Default)]
pub struct AccountBuilder {
    /// BIP39 mnemonic phrase.
    mnemonic: Option<String>,
    /// BIP39 passphrase.
    passphrase: Option<String>,
    /// Key derivation mode (legacy by default).
    derivation: DerivationMode,
    /// Raw private key hex string.
    private_key: Option<String>,
}

impl std::fmt::Debug for AccountBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountBuilder")
            .field("derivation", &self.derivation)
            .finish_non_exhaustive()
    }
}

impl AccountBuilder {
    /// Set the BIP39 mnemonic phrase.
    #[must_use]
    pub fn mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.mnemonic = Some(mnemonic.into());
        self
    }

    /// Set the BIP39 passphrase.
    #[must_use]
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Set the derivation mode used with a mnemonic.
    #[must_use]
    pub fn derivation(mut self, mode: DerivationMode) -> Self {
        self.derivation = mode;
        self
    }

    /// Set the private key directly (hex, with or without 0x prefix).
    #[must_use]
    pub fn private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Build the [`Account`].
    ///
    /// Either `mnemonic` or `private_key` must be set; the mnemonic wins if
    /// both are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMnemonic`] or [`Error::InvalidPrivateKey`] for
    /// bad input, and [`Error::Config`] if neither source was given.
    pub fn build(self) -> Result<Account> {
        let key = if let Some(ref mnemonic) = self.mnemonic {
            private_key_from_mnemonic(mnemonic, self.passphrase.as_deref(), &self.derivation)?
        } else if let Some(ref key) = self.private_key {
            PrivateKey::from_hex(key)?
        } else {
            return Err(Error::config("either mnemonic or private_key is required"));
        };
        Ok(Account::from_private_key(key))
    }
}

/// A signing account: private key, public key and address.
#[derive(Clone)]
pub struct Account {
    key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Account {
    /// Create a builder for constructing an [`Account`].
    #[must_use]
    pub fn builder() -> AccountBuilder {
        AccountBuilder::default()
    }

    /// Create an account from an already parsed key.
    #[must_use]
    pub fn from_private_key(key: PrivateKey) -> Self {
        let public_key = key.public_key();
        let address = super::address::to_address(&public_key);
        Self {
            key,
            public_key,
            address,
        }
    }

    /// The account address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The checksummed address string.
    #[must_use]
    pub fn address_string(&self) -> String {
        to_checksum(&self.address)
    }

    /// The uncompressed public key.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The private key.
    ///
    /// **Security Warning**: Handle this value carefully.
    #[must_use]
    pub const fn private_key(&self) -> &PrivateKey {
        &self.key
    }
}

/// A freshly generated wallet.
#[derive(Clone, Serialize)]
pub struct GeneratedWallet {
    /// Checksummed address.
    pub address: String,
    /// The generated mnemonic.
    pub seed_phrase: String,
    /// Private key hex, no prefix.
    pub private_key: String,
}

impl std::fmt::Debug for GeneratedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Generate a new random mnemonic and derive its account.
///
/// # Errors
///
/// Returns [`Error::InvalidMnemonic`] if `word_count` is not one of
/// [`SUPPORTED_WORD_COUNTS`].
pub fn generate_wallet(word_count: usize, mode: &DerivationMode) -> Result<GeneratedWallet> {
    if !SUPPORTED_WORD_COUNTS.contains(&word_count) {
        return Err(Error::InvalidMnemonic(format!(
            "unsupported word count {word_count}"
        )));
    }
    let wallet = kobe::Wallet::generate(word_count, None)
        .map_err(|e| Error::InvalidMnemonic(format!("generation failed: {e}")))?;
    let phrase = wallet.mnemonic().to_string();
    validate_mnemonic(&phrase)?;

    let account = Account::builder()
        .mnemonic(phrase.clone())
        .derivation(mode.clone())
        .build()?;

    info!(address = %account.address(), "generated new wallet");

    Ok(GeneratedWallet {
        address: account.address_string(),
        seed_phrase: phrase,
        private_key: account.private_key().to_hex(),
    })
}
