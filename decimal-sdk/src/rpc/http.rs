//! [`ChainRpc`] over an alloy HTTP provider.

use std::sync::Arc;

use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{ChainRpc, ReceiptInfo};
use crate::error::{Error, Result};

/// JSON-RPC client backed by a type-erased alloy provider.
///
/// Cloning is cheap; clones share the underlying provider.
#[derive(Clone)]
pub struct HttpRpc {
    provider: Arc<DynProvider<Ethereum>>,
    url: String,
}

impl std::fmt::Debug for HttpRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRpc")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl HttpRpc {
    /// Connect to a single endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] if the URL is invalid or the transport cannot be
    /// set up.
    pub async fn connect(url: &str) -> Result<Self> {
        let provider: DynProvider<Ethereum> = ProviderBuilder::new()
            .connect(url)
            .await
            .map_err(|e| Error::rpc("connect", format!("failed to connect to '{url}': {e}")))?
            .erased();

        debug!(url, "rpc provider connected");

        Ok(Self {
            provider: Arc::new(provider),
            url: url.to_owned(),
        })
    }

    /// Connect to the first endpoint in `urls` that answers `eth_chainId`
    /// with `chain_id`.
    ///
    /// Endpoints serving another chain are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `urls` is empty, otherwise the error of
    /// the last endpoint tried.
    pub async fn connect_any<S: AsRef<str>>(urls: &[S], chain_id: u64) -> Result<Self> {
        let mut last_error = None;
        for url in urls {
            let url = url.as_ref();
            let attempt = match Self::connect(url).await {
                Ok(rpc) => match rpc.chain_id().await {
                    Ok(reported) => check_chain_id(url, chain_id, reported).map(|()| rpc),
                    Err(e) => Err(e),
                },
                Err(e) => Err(e),
            };
            match attempt {
                Ok(rpc) => {
                    info!(url, chain_id, "connected to rpc endpoint");
                    return Ok(rpc);
                }
                Err(e) => {
                    warn!(url, error = %e, "rpc endpoint unavailable, trying next");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| Error::config("no rpc urls configured")))
    }

    /// The endpoint this client talks to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The underlying provider.
    #[must_use]
    pub fn provider(&self) -> &DynProvider<Ethereum> {
        &self.provider
    }
}

fn check_chain_id(url: &str, expected: u64, reported: u64) -> Result<()> {
    if reported == expected {
        Ok(())
    } else {
        Err(Error::config(format!(
            "endpoint '{url}' serves chain {reported}, expected {expected}"
        )))
    }
}

#[async_trait]
impl ChainRpc for HttpRpc {
    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::rpc("eth_chainId", e))
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| Error::rpc("eth_getBalance", e))
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| Error::rpc("eth_getTransactionCount", e))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| Error::rpc("eth_gasPrice", e))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| Error::rpc("eth_sendRawTransaction", e))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Option<ReceiptInfo>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| Error::rpc("eth_getTransactionReceipt", e))?;
        Ok(receipt.map(|r| ReceiptInfo {
            success: r.status(),
            block_number: r.block_number(),
            gas_used: r.gas_used(),
        }))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        self.provider
            .call(request)
            .await
            .map_err(|e| Error::rpc("eth_call", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_any_requires_urls() {
        let urls: [&str; 0] = [];
        let err = HttpRpc::connect_any(&urls, 75).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_check_chain_id() {
        assert!(check_chain_id("http://node", 75, 75).is_ok());
        let err = check_chain_id("http://node", 75, 1).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("serves chain 1, expected 75"));
    }

    #[tokio::test]
    async fn test_connect_any_skips_unreachable() {
        let urls = ["http://127.0.0.1:1/", "http://127.0.0.1:2/"];
        let err = HttpRpc::connect_any(&urls, 75).await.unwrap_err();
        assert!(err.is_indeterminate());
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        // HTTP transports do not dial until the first request.
        let rpc = HttpRpc::connect("http://127.0.0.1:1/").await.unwrap();
        assert_eq!(rpc.url(), "http://127.0.0.1:1/");
        let err = rpc.gas_price().await.unwrap_err();
        assert!(err.is_indeterminate());
    }
}
