//! Receipt polling.

use std::time::Duration;

use alloy::primitives::B256;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::rpc::{ChainRpc, ReceiptInfo};

/// Poll for the receipt of `tx_hash` every `poll_interval` until one arrives
/// or `limit` elapses.
///
/// RPC errors while polling are logged and the poll is retried.
///
/// # Errors
///
/// Returns [`Error::ReceiptTimeout`] if no receipt arrived in time.
pub async fn wait_for_receipt<R>(
    rpc: &R,
    tx_hash: B256,
    poll_interval: Duration,
    limit: Duration,
) -> Result<ReceiptInfo>
where
    R: ChainRpc + ?Sized,
{
    let polling = async {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match rpc.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return receipt,
                Ok(None) => debug!(%tx_hash, attempt, "receipt not available yet"),
                Err(e) => warn!(%tx_hash, attempt, error = %e, "receipt poll failed"),
            }
            sleep(poll_interval).await;
        }
    };

    timeout(limit, polling)
        .await
        .map_err(|_| Error::ReceiptTimeout { tx_hash })
}
