//! Transfer orchestration.
//!
//! A transfer runs through a fixed sequence of stages:
//!
//! ```text
//! Start ─▶ BalanceChecked ─▶ NonceFetched ─▶ GasPriceFetched ─▶ Built
//!   ─▶ Signed ─▶ Submitted ─▶ Confirmed | Failed | TimedOut
//! ```
//!
//! Input is validated at `Start`, before any RPC call. Once a transaction has
//! been submitted it is never resent: a timeout is reported as
//! [`Error::ReceiptTimeout`] and the caller decides what to do.

mod receipt;

pub use receipt::wait_for_receipt;

use std::fmt;

use alloy::primitives::{Address, B256, Bytes, U256};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::rpc::ChainRpc;
use crate::token::token_balance;
use crate::tx::calldata::encode_transfer_call;
use crate::tx::legacy::LegacyTransaction;
use crate::units::{Balance, to_base_units};
use crate::wallet::{Account, parse_address};

/// Where a transfer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStage {
    /// Input validated.
    Start,
    /// Sender can cover the amount.
    BalanceChecked,
    /// Pending nonce known.
    NonceFetched,
    /// Gas price known.
    GasPriceFetched,
    /// Unsigned transaction assembled.
    Built,
    /// Signature attached.
    Signed,
    /// Accepted by the node.
    Submitted,
    /// Mined with a success status.
    Confirmed,
    /// Mined but reverted.
    Failed,
    /// No receipt within the timeout.
    TimedOut,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::BalanceChecked => "balance_checked",
            Self::NonceFetched => "nonce_fetched",
            Self::GasPriceFetched => "gas_price_fetched",
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(name)
    }
}

/// What is being transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// The native coin, optionally with a UTF-8 message in `data`.
    Native {
        /// Message attached to the transaction.
        message: Option<String>,
    },
    /// An ERC20-style token.
    Token {
        /// Token contract.
        contract: Address,
        /// Token decimals, used to scale the amount.
        decimals: u8,
    },
}

impl Transfer {
    /// Native transfer without a message.
    #[must_use]
    pub const fn native() -> Self {
        Self::Native { message: None }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Native { .. } => "native",
            Self::Token { .. } => "token",
        }
    }

    fn message_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Native {
                message: Some(message),
            } if !message.is_empty() => Some(message.as_bytes()),
            _ => None,
        }
    }
}

/// Recipient and amount of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address as text.
    pub to: String,
    /// Human decimal amount, e.g. `"1.5"`.
    pub amount: String,
}

impl TransferRequest {
    /// Create a request.
    #[must_use]
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
        }
    }
}

/// Result of a submitted transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// Whether the transaction executed successfully.
    pub success: bool,
    /// Final stage reached.
    pub stage: TransferStage,
    /// Transaction hash.
    pub tx_hash: B256,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
    /// Sender balance of the transferred asset after confirmation.
    pub balance_after: Option<Balance>,
    /// Failure description when `success` is false.
    pub error: Option<String>,
}

/// Drives one transfer through its stages against an RPC collaborator.
#[derive(Debug)]
pub struct Orchestrator<'a, R: ?Sized> {
    rpc: &'a R,
    config: &'a ChainConfig,
}

impl<'a, R> Orchestrator<'a, R>
where
    R: ChainRpc + ?Sized,
{
    /// Create an orchestrator.
    #[must_use]
    pub const fn new(rpc: &'a R, config: &'a ChainConfig) -> Self {
        Self { rpc, config }
    }

    /// Run a transfer from `account`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAddress`] / [`Error::InvalidAmount`] before any RPC call
    /// - [`Error::InsufficientBalance`] before signing
    /// - [`Error::Signing`] if signing fails
    /// - [`Error::Rpc`] if a query or the broadcast fails
    /// - [`Error::ReceiptTimeout`] if the transaction was sent but not mined in time
    ///
    /// A mined but reverted transaction is not an error; it returns an
    /// outcome with `success == false`.
    #[instrument(
        name = "transfer",
        skip_all,
        fields(kind = transfer.kind(), from = %account.address(), to = %request.to)
    )]
    pub async fn execute(
        &self,
        account: &Account,
        transfer: &Transfer,
        request: &TransferRequest,
    ) -> Result<TransferOutcome> {
        let sender = account.address();
        let to = parse_address(&request.to)?;
        let decimals = self.decimals(transfer);
        let amount = to_base_units(&request.amount, decimals)?;
        enter(TransferStage::Start);

        let available = self.asset_balance(transfer, sender).await?;
        if available < amount {
            return Err(Error::InsufficientBalance {
                required: amount,
                available,
            });
        }
        enter(TransferStage::BalanceChecked);

        let nonce = self.rpc.pending_nonce(sender).await?;
        enter(TransferStage::NonceFetched);

        let gas_price = self.rpc.gas_price().await?;
        enter(TransferStage::GasPriceFetched);

        let tx = self.build(transfer, to, amount, nonce, gas_price);
        debug!(nonce, gas_price, gas_limit = tx.gas_limit, "transaction built");
        enter(TransferStage::Built);

        let signed = tx.sign(account.private_key())?;
        enter(TransferStage::Signed);

        let tx_hash = self.rpc.send_raw_transaction(&signed.raw).await?;
        if tx_hash != signed.hash {
            warn!(local = %signed.hash, node = %tx_hash, "node reported a different tx hash");
        }
        info!(%tx_hash, "transaction submitted");
        enter(TransferStage::Submitted);

        let receipt = match wait_for_receipt(
            self.rpc,
            tx_hash,
            self.config.poll_interval,
            self.config.receipt_timeout,
        )
        .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                enter(TransferStage::TimedOut);
                return Err(e);
            }
        };

        if !receipt.success {
            warn!(%tx_hash, block = ?receipt.block_number, "transaction reverted");
            enter(TransferStage::Failed);
            return Ok(TransferOutcome {
                success: false,
                stage: TransferStage::Failed,
                tx_hash,
                block_number: receipt.block_number,
                gas_used: receipt.gas_used,
                balance_after: None,
                error: Some("transaction not confirmed".into()),
            });
        }

        info!(%tx_hash, block = ?receipt.block_number, gas_used = receipt.gas_used, "transaction confirmed");
        enter(TransferStage::Confirmed);

        let balance_after = match self.asset_balance(transfer, sender).await {
            Ok(raw) => Balance::new(raw, decimals).ok(),
            Err(e) => {
                warn!(error = %e, "failed to query balance after transfer");
                None
            }
        };

        Ok(TransferOutcome {
            success: true,
            stage: TransferStage::Confirmed,
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            balance_after,
            error: None,
        })
    }

    const fn decimals(&self, transfer: &Transfer) -> u8 {
        match transfer {
            Transfer::Native { .. } => self.config.native_decimals,
            Transfer::Token { decimals, .. } => *decimals,
        }
    }

    async fn asset_balance(&self, transfer: &Transfer, owner: Address) -> Result<U256> {
        match transfer {
            Transfer::Native { .. } => self.rpc.balance(owner).await,
            Transfer::Token { contract, decimals } => {
                Ok(token_balance(self.rpc, *contract, owner, *decimals).await?.raw)
            }
        }
    }

    fn build(
        &self,
        transfer: &Transfer,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_price: u128,
    ) -> LegacyTransaction {
        let gas = &self.config.gas;
        let (to, value, data, gas_limit) = match transfer {
            Transfer::Native { .. } => match transfer.message_bytes() {
                Some(message) => (
                    to,
                    amount,
                    Bytes::copy_from_slice(message),
                    gas.transfer_with_message,
                ),
                None => (to, amount, Bytes::new(), gas.transfer),
            },
            Transfer::Token { contract, .. } => (
                *contract,
                U256::ZERO,
                encode_transfer_call(to, amount),
                gas.token_transfer,
            ),
        };

        LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            chain_id: self.config.chain_id,
        }
    }
}

fn enter(stage: TransferStage) {
    debug!(%stage, "transfer stage");
}
