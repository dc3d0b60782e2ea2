//! Wallet primitives: mnemonics, keys and addresses.
//!
//! # Architecture
//!
//! ```text
//! mnemonic ── validate_mnemonic / derive_seed ──▶ Seed
//!   Seed ── derive_private_key (legacy) ──▶ PrivateKey
//!   mnemonic ── kobe_eth (Bip44 mode) ──▶ PrivateKey
//!   PrivateKey ── public_key ──▶ PublicKey ── to_address ──▶ Address
//!   Address ── to_checksum ──▶ "0xAbC..."
//! ```
//!
//! [`Account`] wraps the whole chain behind a builder.

mod account;
mod address;
mod derivation;
mod keys;
mod mnemonic;

pub use account::{Account, AccountBuilder, GeneratedWallet, generate_wallet};
pub use address::{is_valid_address, parse_address, to_address, to_checksum};
pub use derivation::{
    DEFAULT_DERIVATION_PATH, DerivationMode, LEGACY_HMAC_KEY, derive_private_key,
    private_key_from_mnemonic,
};
pub use keys::{PrivateKey, PublicKey, is_valid_private_key};
pub use mnemonic::{
    DEFAULT_WORD_COUNT, SUPPORTED_WORD_COUNTS, Seed, derive_seed, is_valid_mnemonic,
    validate_mnemonic,
};
