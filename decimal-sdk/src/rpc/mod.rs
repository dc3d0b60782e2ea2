//! The JSON-RPC collaborator.
//!
//! Everything the SDK needs from a node goes through [`ChainRpc`]. The
//! orchestration code is generic over it so tests can script node behaviour;
//! [`HttpRpc`] is the production implementation on top of alloy.

use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

mod http;

pub use http::HttpRpc;

/// The fields of a transaction receipt the SDK reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceiptInfo {
    /// Execution status; `false` means the transaction reverted.
    pub success: bool,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
}

/// Node operations used by the SDK.
///
/// Every method maps to one JSON-RPC call. Implementations report failures as
/// [`Error::Rpc`](crate::Error::Rpc) carrying the method name.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64>;

    /// `eth_getBalance` at the latest block.
    async fn balance(&self, address: Address) -> Result<U256>;

    /// `eth_getTransactionCount` including pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64>;

    /// `eth_gasPrice`.
    async fn gas_price(&self) -> Result<u128>;

    /// `eth_sendRawTransaction`; returns the hash reported by the node.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<ReceiptInfo>>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}
