//! Chain and client configuration.
//!
//! [`ChainConfig`] carries every network constant the SDK needs: chain id,
//! RPC endpoints, the token registry contract, gas limits and receipt polling
//! timings. The defaults target Decimal mainnet.

use std::time::Duration;

use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Decimal mainnet chain id.
pub const DECIMAL_CHAIN_ID: u64 = 75;

/// Default JSON-RPC endpoint.
pub const DECIMAL_RPC_URL: &str = "http://94.130.66.14/web3/";

/// Fallback JSON-RPC endpoints, tried in order after [`DECIMAL_RPC_URL`].
pub const DECIMAL_FALLBACK_RPC_URLS: [&str; 2] = [
    "https://node.decimalchain.com/web3",
    "http://168.119.212.76/web3/",
];

/// Token registry ("token center") contract resolving symbols to addresses.
pub const TOKEN_CENTER_ADDRESS: Address = address!("9113ba675aa8f2ef0c068cee2cdabab95b6437fb");

/// Gas limits used when building transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasLimits {
    /// Plain native coin transfer.
    pub transfer: u64,
    /// Native coin transfer carrying a message in `data`.
    pub transfer_with_message: u64,
    /// Token `transfer(address,uint256)` call.
    pub token_transfer: u64,
}

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            transfer: 21_000,
            transfer_with_message: 25_000,
            token_transfer: 100_000,
        }
    }
}

/// Network configuration for a [`DecimalClient`](crate::client::DecimalClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// EIP-155 chain id embedded in signatures.
    pub chain_id: u64,
    /// JSON-RPC endpoints, in order of preference.
    pub rpc_urls: Vec<String>,
    /// Token registry contract.
    pub token_center: Address,
    /// Symbol of the native coin.
    pub native_symbol: String,
    /// Decimals of the native coin.
    pub native_decimals: u8,
    /// Gas limits per transaction kind.
    pub gas: GasLimits,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
    /// Overall time to wait for a receipt.
    pub receipt_timeout: Duration,
}

impl Default for ChainConfig {
    fn default() -> Self {
        let rpc_urls = std::iter::once(DECIMAL_RPC_URL)
            .chain(DECIMAL_FALLBACK_RPC_URLS)
            .map(String::from)
            .collect();

        Self {
            chain_id: DECIMAL_CHAIN_ID,
            rpc_urls,
            token_center: TOKEN_CENTER_ADDRESS,
            native_symbol: "DEL".into(),
            native_decimals: 18,
            gas: GasLimits::default(),
            poll_interval: Duration::from_secs(2),
            receipt_timeout: Duration::from_secs(60),
        }
    }
}

impl ChainConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Use a single RPC endpoint instead of the default list.
    #[must_use]
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_urls = vec![url.into()];
        self
    }

    /// Set the chain id.
    #[must_use]
    pub const fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Set the delay between receipt polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the overall receipt timeout.
    #[must_use]
    pub const fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    /// Check the configuration for values the SDK cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.rpc_urls.is_empty() {
            return Err(Error::config("at least one rpc url is required"));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll_interval must be non-zero"));
        }
        if self.receipt_timeout < self.poll_interval {
            return Err(Error::config(
                "receipt_timeout must not be shorter than poll_interval",
            ));
        }
        if self.gas.transfer_with_message < self.gas.transfer {
            return Err(Error::config(
                "transfer_with_message gas must be at least the plain transfer gas",
            ));
        }
        Ok(())
    }
}
