//! High-level client for Decimal chain.
//!
//! [`DecimalClient`] owns an RPC handle and a [`ChainConfig`] and exposes the
//! everyday operations: balances, token lookups and transfers signed from a
//! mnemonic.
//!
//! ```rust,ignore
//! let client = DecimalClient::connect(ChainConfig::default()).await?;
//! let balance = client.native_balance("0xa8E0...").await?;
//! let outcome = client
//!     .send_native(mnemonic, "0x4090...", "1.5", Some("hello"))
//!     .await?;
//! ```

use alloy::primitives::Address;
use serde::Serialize;
use tracing::info;

use crate::config::ChainConfig;
use crate::error::Result;
use crate::rpc::{ChainRpc, HttpRpc};
use crate::token::{TokenInfo, lookup_token, token_balance, token_decimals};
use crate::transfer::{Orchestrator, Transfer, TransferOutcome, TransferRequest};
use crate::units::{Balance, validate_amount};
use crate::wallet::{Account, DerivationMode, parse_address};

/// A token together with a holder's balance of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    /// The resolved token.
    pub token: TokenInfo,
    /// The holder's balance.
    pub balance: Balance,
}

/// Long-lived handle for talking to Decimal chain.
#[derive(Debug, Clone)]
pub struct DecimalClient<R = HttpRpc> {
    rpc: R,
    config: ChainConfig,
    derivation: DerivationMode,
}

impl DecimalClient<HttpRpc> {
    /// Connect over HTTP to the first reachable endpoint in `config.rpc_urls`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) for an invalid
    /// configuration and [`Error::Rpc`](crate::Error::Rpc) if no endpoint
    /// answers.
    pub async fn connect(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let rpc = HttpRpc::connect_any(&config.rpc_urls, config.chain_id).await?;
        info!(url = rpc.url(), chain_id = config.chain_id, "decimal client ready");
        Ok(Self::new(rpc, config))
    }
}

impl<R> DecimalClient<R>
where
    R: ChainRpc,
{
    /// Wrap an existing RPC handle.
    #[must_use]
    pub fn new(rpc: R, config: ChainConfig) -> Self {
        Self {
            rpc,
            config,
            derivation: DerivationMode::default(),
        }
    }

    /// Use `mode` when turning mnemonics into sending accounts.
    #[must_use]
    pub fn with_derivation(mut self, mode: DerivationMode) -> Self {
        self.derivation = mode;
        self
    }

    /// The RPC handle.
    #[must_use]
    pub const fn rpc(&self) -> &R {
        &self.rpc
    }

    /// The chain configuration.
    #[must_use]
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Derive the sending account for `mnemonic`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMnemonic`](crate::Error::InvalidMnemonic).
    pub fn account(&self, mnemonic: &str) -> Result<Account> {
        Account::builder()
            .mnemonic(mnemonic)
            .derivation(self.derivation.clone())
            .build()
    }

    /// Native coin balance of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`](crate::Error::InvalidAddress) or
    /// [`Error::Rpc`](crate::Error::Rpc).
    pub async fn native_balance(&self, address: &str) -> Result<Balance> {
        let address = parse_address(address)?;
        let raw = self.rpc.balance(address).await?;
        Balance::new(raw, self.config.native_decimals)
    }

    /// Resolve a token symbol through the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenNotFound`](crate::Error::TokenNotFound) or
    /// [`Error::Rpc`](crate::Error::Rpc).
    pub async fn token_info(&self, symbol: &str) -> Result<TokenInfo> {
        lookup_token(&self.rpc, self.config.token_center, symbol).await
    }

    /// Balance of `owner` in the token at `contract`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`](crate::Error::Rpc) if a call fails.
    pub async fn token_balance(&self, contract: Address, owner: &str) -> Result<Balance> {
        let owner = parse_address(owner)?;
        let decimals = token_decimals(&self.rpc, contract).await?;
        token_balance(&self.rpc, contract, owner, decimals).await
    }

    /// Resolve `symbol` and read `owner`'s balance of it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenNotFound`](crate::Error::TokenNotFound) for an
    /// unknown symbol.
    pub async fn token_balance_by_symbol(&self, symbol: &str, owner: &str) -> Result<TokenBalance> {
        let owner = parse_address(owner)?;
        let token = self.token_info(symbol).await?;
        let balance = token_balance(&self.rpc, token.address, owner, token.decimals).await?;
        Ok(TokenBalance { token, balance })
    }

    /// Send native coin, optionally attaching a message.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::execute`].
    pub async fn send_native(
        &self,
        mnemonic: &str,
        to: &str,
        amount: &str,
        message: Option<&str>,
    ) -> Result<TransferOutcome> {
        let account = self.account(mnemonic)?;
        let transfer = Transfer::Native {
            message: message.map(str::to_owned),
        };
        self.execute(&account, &transfer, to, amount).await
    }

    /// Send a token identified by its registry symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenNotFound`](crate::Error::TokenNotFound) for an
    /// unknown symbol, otherwise see [`Orchestrator::execute`].
    pub async fn send_token_by_symbol(
        &self,
        mnemonic: &str,
        symbol: &str,
        to: &str,
        amount: &str,
    ) -> Result<TransferOutcome> {
        let account = self.account(mnemonic)?;
        parse_address(to)?;
        validate_amount(amount)?;
        let token = self.token_info(symbol).await?;
        let transfer = Transfer::Token {
            contract: token.address,
            decimals: token.decimals,
        };
        self.execute(&account, &transfer, to, amount).await
    }

    /// Pay out a prize: the native coin with a note, or a token by symbol.
    ///
    /// # Errors
    ///
    /// See [`send_native`](Self::send_native) and
    /// [`send_token_by_symbol`](Self::send_token_by_symbol).
    pub async fn send_prize(
        &self,
        mnemonic: &str,
        winner: &str,
        coin_symbol: &str,
        amount: &str,
    ) -> Result<TransferOutcome> {
        if coin_symbol == self.config.native_symbol {
            let message = format!("Приз лотереи: {amount} {coin_symbol}");
            self.send_native(mnemonic, winner, amount, Some(&message))
                .await
        } else {
            self.send_token_by_symbol(mnemonic, coin_symbol, winner, amount)
                .await
        }
    }

    async fn execute(
        &self,
        account: &Account,
        transfer: &Transfer,
        to: &str,
        amount: &str,
    ) -> Result<TransferOutcome> {
        let request = TransferRequest::new(to, amount);
        Orchestrator::new(&self.rpc, &self.config)
            .execute(account, transfer, &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use alloy::primitives::U256;

    use super::*;
    use crate::error::Error;
    use crate::rpc::stub::StubRpc;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon \
                                 abandon abandon abandon abandon abandon about";
    const WINNER: &str = "0x40900a48273644768C09183E00E43528c17A29f6";

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn client(rpc: StubRpc) -> DecimalClient<StubRpc> {
        DecimalClient::new(rpc, ChainConfig::default())
    }

    fn funded() -> StubRpc {
        StubRpc {
            native_balance: e18(50),
            token_balance: e18(50),
            token_address: Address::repeat_byte(0x77),
            ..StubRpc::default()
        }
    }

    #[test]
    fn test_native_balance() {
        let client = client(StubRpc {
            native_balance: e18(3) / U256::from(2u64),
            ..StubRpc::default()
        });
        let balance = tokio_test::block_on(client.native_balance(WINNER)).unwrap();
        assert_eq!(balance.formatted, "1.5");
        assert_eq!(balance.decimals, 18);
    }

    #[tokio::test]
    async fn test_native_balance_rejects_address() {
        let client = client(StubRpc::default());
        let err = client.native_balance("0xnothex").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert_eq!(client.rpc().balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_token_balance_by_symbol() {
        let client = client(StubRpc {
            token_address: Address::repeat_byte(0x77),
            token_decimals: 6,
            token_balance: U256::from(1_250_000u64),
            ..StubRpc::default()
        });
        let result = client
            .token_balance_by_symbol("fridaycoin", WINNER)
            .await
            .unwrap();
        assert_eq!(result.token.address, Address::repeat_byte(0x77));
        assert_eq!(result.balance.formatted, "1.25");

        let direct = client
            .token_balance(Address::repeat_byte(0x77), WINNER)
            .await
            .unwrap();
        assert_eq!(direct, result.balance);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let client = client(StubRpc::default());
        let err = client.token_info("nope").await.unwrap_err();
        assert!(matches!(err, Error::TokenNotFound(_)));

        let err = client
            .send_token_by_symbol(TEST_MNEMONIC, "nope", WINNER, "1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenNotFound(_)));
        assert_eq!(client.rpc().sends(), 0);
    }

    #[tokio::test]
    async fn test_send_token_rejects_amount_before_lookup() {
        let client = client(funded());
        for amount in ["0", "-1", "abc"] {
            let err = client
                .send_token_by_symbol(TEST_MNEMONIC, "nope", WINNER, amount)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidAmount(_)), "{amount}: {err}");

            let err = client
                .send_prize(TEST_MNEMONIC, WINNER, "nope", amount)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidAmount(_)), "{amount}: {err}");
        }
        assert!(client.rpc().calls.lock().unwrap().is_empty());
        assert_eq!(client.rpc().balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_native_rejects_mnemonic_before_rpc() {
        let client = client(funded());
        let err = client
            .send_native("abandon abandon", WINNER, "1", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMnemonic(_)));
        assert_eq!(client.rpc().balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_prize_native_attaches_message() {
        let client = client(funded());
        let outcome = client
            .send_prize(TEST_MNEMONIC, WINNER, "DEL", "5")
            .await
            .unwrap();
        assert!(outcome.success);

        let raw = client.rpc().last_sent().unwrap();
        let message = "Приз лотереи: 5 DEL".as_bytes();
        assert!(raw.windows(message.len()).any(|w| w == message));
        // gasLimit 25000 follows the one-byte nonce and 6-byte gas price.
        assert_eq!(&raw[9..12], &[0x82, 0x61, 0xa8]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_prize_token() {
        let client = client(funded());
        let outcome = client
            .send_prize(TEST_MNEMONIC, WINNER, "fridaycoin", "5")
            .await
            .unwrap();
        assert!(outcome.success);

        let raw = client.rpc().last_sent().unwrap();
        let contract = Address::repeat_byte(0x77);
        assert!(raw.windows(20).any(|w| w == contract.as_slice()));
        // balanceOf before and after; the native balance is never read.
        assert_eq!(client.rpc().balance_calls.load(Ordering::SeqCst), 2);
        let calls = client.rpc().calls.lock().unwrap();
        assert!(calls.iter().any(|(to, _)| *to == ChainConfig::default().token_center));
    }

    #[test]
    fn test_bip44_derivation_changes_sender() {
        let legacy = client(funded());
        let bip44 = client(funded()).with_derivation(DerivationMode::Bip44 { index: 0 });
        let a = legacy.account(TEST_MNEMONIC).unwrap();
        let b = bip44.account(TEST_MNEMONIC).unwrap();
        assert_eq!(b.address_string(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_ne!(a.address(), b.address());
    }
}
