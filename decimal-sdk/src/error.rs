//! Error types for the Decimal SDK.
//!
//! Every fallible operation in the crate returns [`Result`]. Input problems
//! (bad mnemonic, address, key or amount) are reported before any network
//! call is made; collaborator failures are wrapped in [`Error::Rpc`].

use alloy::primitives::{B256, U256};

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the SDK.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The mnemonic has the wrong word count or fails its checksum.
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The address is not `0x` + 40 hex digits or has a bad checksum.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The private key has the wrong length, is zero, or is out of range.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The amount does not parse or is not strictly positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The sender cannot cover the requested amount.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Requested amount in base units.
        required: U256,
        /// Queried balance in base units.
        available: U256,
    },

    /// The token registry has no contract for this symbol.
    #[error("token {0} not found")]
    TokenNotFound(String),

    /// Producing the transaction signature failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// An RPC collaborator call failed.
    #[error("rpc error in {method}: {message}")]
    Rpc {
        /// JSON-RPC method that failed.
        method: &'static str,
        /// Error reported by the transport or node.
        message: String,
    },

    /// No receipt arrived before the configured timeout.
    #[error("timed out waiting for receipt of {tx_hash}")]
    ReceiptTimeout {
        /// Hash of the submitted transaction.
        tx_hash: B256,
    },

    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Create an RPC error for the given method.
    #[must_use]
    pub fn rpc(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Rpc {
            method,
            message: err.to_string(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Whether this error was raised while validating caller input.
    ///
    /// Validation errors are always reported before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidMnemonic(_)
                | Self::InvalidAddress(_)
                | Self::InvalidPrivateKey(_)
                | Self::InvalidAmount(_)
        )
    }

    /// Whether the outcome on chain is unknown.
    ///
    /// A transaction may still be mined after one of these; callers should
    /// check its status before resending.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::ReceiptTimeout { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::rpc("eth_gasPrice", "connection refused");
        assert!(matches!(err, Error::Rpc { method: "eth_gasPrice", .. }));
        assert_eq!(
            err.to_string(),
            "rpc error in eth_gasPrice: connection refused"
        );

        let err = Error::config("missing rpc url");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::InvalidAmount("0".into()).is_validation());
        assert!(Error::InvalidAddress("0x12".into()).is_validation());
        assert!(!Error::TokenNotFound("abc".into()).is_validation());

        let timeout = Error::ReceiptTimeout {
            tx_hash: B256::ZERO,
        };
        assert!(timeout.is_indeterminate());
        assert!(Error::rpc("eth_sendRawTransaction", "boom").is_indeterminate());
        assert!(!Error::signing("bad key").is_indeterminate());
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = Error::InsufficientBalance {
            required: U256::from(10u64),
            available: U256::from(3u64),
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance: required 10, available 3"
        );
    }
}
