#![cfg_attr(docsrs, feature(doc_cfg))]
//! Wallet SDK for Decimal chain.
//!
//! Derives accounts from BIP39 mnemonics, builds and signs legacy EIP-155
//! transactions for native coin and token transfers, and drives them through
//! submission and receipt polling.
//!
//! ```rust,ignore
//! use decimal_sdk::{ChainConfig, DecimalClient};
//!
//! let client = DecimalClient::connect(ChainConfig::default()).await?;
//! let outcome = client
//!     .send_token_by_symbol(mnemonic, "fridaycoin", recipient, "10")
//!     .await?;
//! println!("{} in block {:?}", outcome.tx_hash, outcome.block_number);
//! ```
//!
//! The signing pipeline is usable without any network:
//!
//! ```rust,ignore
//! use decimal_sdk::tx::LegacyTransaction;
//! use decimal_sdk::wallet::Account;
//!
//! let account = Account::builder().mnemonic(mnemonic).build()?;
//! let signed = LegacyTransaction { /* ... */ }.sign(account.private_key())?;
//! let raw = signed.raw_hex();
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod rpc;
pub mod token;
pub mod transfer;
pub mod tx;
pub mod units;
pub mod wallet;

pub use client::{DecimalClient, TokenBalance};
pub use config::{ChainConfig, GasLimits};
pub use error::{Error, Result};
pub use rpc::{ChainRpc, HttpRpc, ReceiptInfo};
pub use token::TokenInfo;
pub use transfer::{Orchestrator, Transfer, TransferOutcome, TransferRequest, TransferStage};
pub use units::Balance;
pub use wallet::{Account, DerivationMode, GeneratedWallet, generate_wallet};
