//! Token registry and ERC20 read calls.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::rpc::ChainRpc;
use crate::tx::calldata::{
    decode_address_word, decode_uint_word, encode_balance_of_call, encode_decimals_call,
    encode_tokens_call,
};
use crate::units::Balance;

/// A token resolved through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    /// Symbol as registered.
    pub symbol: String,
    /// Token contract.
    pub address: Address,
    /// Decimals reported by the contract.
    pub decimals: u8,
}

/// Resolve `symbol` through the registry at `registry`, then read its
/// decimals.
///
/// # Errors
///
/// Returns [`Error::TokenNotFound`] if the registry answers with the zero
/// address, or [`Error::Rpc`] if either call fails.
pub async fn lookup_token<R>(rpc: &R, registry: Address, symbol: &str) -> Result<TokenInfo>
where
    R: ChainRpc + ?Sized,
{
    let returned = rpc.call(registry, encode_tokens_call(symbol)).await?;
    let address = decode_address_word(&returned)?;
    if address.is_zero() {
        return Err(Error::TokenNotFound(symbol.to_owned()));
    }

    let decimals = token_decimals(rpc, address).await?;
    debug!(symbol, %address, decimals, "resolved token");

    Ok(TokenInfo {
        symbol: symbol.to_owned(),
        address,
        decimals,
    })
}

/// Read `decimals()` of a token contract.
///
/// # Errors
///
/// Returns [`Error::Rpc`] if the call fails or the value does not fit a `u8`.
pub async fn token_decimals<R>(rpc: &R, token: Address) -> Result<u8>
where
    R: ChainRpc + ?Sized,
{
    let returned = rpc.call(token, encode_decimals_call()).await?;
    let decimals = decode_uint_word(&returned)?;
    u8::try_from(decimals)
        .map_err(|_| Error::rpc("eth_call", format!("decimals() returned {decimals}")))
}

/// Read `balanceOf(owner)` of a token contract, formatted with `decimals`.
///
/// # Errors
///
/// Returns [`Error::Rpc`] if the call fails.
pub async fn token_balance<R>(rpc: &R, token: Address, owner: Address, decimals: u8) -> Result<Balance>
where
    R: ChainRpc + ?Sized,
{
    let returned = rpc.call(token, encode_balance_of_call(owner)).await?;
    Balance::new(decode_uint_word(&returned)?, decimals)
}
