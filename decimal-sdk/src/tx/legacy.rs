//! Legacy (pre-EIP-2718) transactions with EIP-155 replay protection.
//!
//! The signing payload is the 9-field list
//! `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`; the signed
//! transaction replaces the last three with `[v, r, s]` where
//! `v = recoveryId + 35 + 2 * chainId`.

use alloy::primitives::{Address, B256, Bytes, U256, hex, keccak256};
use alloy::signers::SignerSync;
use serde::Serialize;

use super::rlp::{Field, encode_list};
use crate::error::{Error, Result};
use crate::wallet::PrivateKey;

/// Unsigned fields of a legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas price in base units per gas.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient (or token contract).
    pub to: Address,
    /// Native value in base units.
    pub value: U256,
    /// Call data or message payload.
    pub data: Bytes,
    /// Chain id used for replay protection.
    pub chain_id: u64,
}

/// An ECDSA signature with its recovery id, before `v` is chain-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// The `r` scalar.
    pub r: U256,
    /// The `s` scalar (low-s normalised).
    pub s: U256,
    /// Parity of the nonce point's `y` coordinate, 0 or 1.
    pub recovery_id: u8,
}

/// The `(v, r, s)` triple as it appears in a signed legacy transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxSignature {
    /// `recoveryId + 35 + 2 * chainId`.
    pub v: u64,
    /// The `r` scalar.
    pub r: U256,
    /// The `s` scalar.
    pub s: U256,
}

impl TxSignature {
    /// Combine a recoverable signature with a chain id.
    #[must_use]
    pub const fn new(sig: RecoverableSignature, chain_id: u64) -> Self {
        Self {
            v: eip155_v(sig.recovery_id, chain_id),
            r: sig.r,
            s: sig.s,
        }
    }
}

/// A signed, encoded transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Encoded bytes.
    pub raw: Bytes,
    /// Transaction hash, `keccak256(raw)`.
    pub hash: B256,
    /// The embedded signature.
    pub signature: TxSignature,
}

impl SignedTransaction {
    /// `0x`-prefixed lowercase hex of the raw bytes.
    #[must_use]
    pub fn raw_hex(&self) -> String {
        hex::encode_prefixed(&self.raw)
    }
}

/// EIP-155 `v` value.
#[must_use]
pub const fn eip155_v(recovery_id: u8, chain_id: u64) -> u64 {
    recovery_id as u64 + 35 + 2 * chain_id
}

/// Sign a 32-byte digest with RFC 6979 deterministic nonces.
///
/// # Errors
///
/// Returns [`Error::Signing`] if the signing primitive fails.
pub fn sign_hash(digest: &B256, key: &PrivateKey) -> Result<RecoverableSignature> {
    let signature = key
        .signer()
        .sign_hash_sync(digest)
        .map_err(|e| Error::signing(format!("hash signing failed: {e}")))?;
    Ok(RecoverableSignature {
        r: signature.r(),
        s: signature.s(),
        recovery_id: u8::from(signature.v()),
    })
}

impl LegacyTransaction {
    fn common_fields(&self) -> Vec<Field> {
        vec![
            Field::from(self.nonce),
            Field::from(self.gas_price),
            Field::from(self.gas_limit),
            Field::from(self.to),
            Field::from(self.value),
            Field::from(&self.data),
        ]
    }

    /// Encode the signing payload: the six fields plus `chainId, 0, 0`.
    #[must_use]
    pub fn encode_for_signing(&self) -> Vec<u8> {
        let mut fields = self.common_fields();
        fields.extend([
            Field::from(self.chain_id),
            Field::Uint(U256::ZERO),
            Field::Uint(U256::ZERO),
        ]);
        encode_list(&fields)
    }

    /// The digest that gets signed.
    #[must_use]
    pub fn signature_hash(&self) -> B256 {
        keccak256(self.encode_for_signing())
    }

    /// Encode with `v, r, s` in place of the signing placeholders.
    #[must_use]
    pub fn encode_signed(&self, signature: &TxSignature) -> Vec<u8> {
        let mut fields = self.common_fields();
        fields.extend([
            Field::from(signature.v),
            Field::from(signature.r),
            Field::from(signature.s),
        ]);
        encode_list(&fields)
    }

    /// Sign and encode the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] if signing fails.
    pub fn sign(&self, key: &PrivateKey) -> Result<SignedTransaction> {
        let digest = self.signature_hash();
        let signature = TxSignature::new(sign_hash(&digest, key)?, self.chain_id);
        let raw: Bytes = self.encode_signed(&signature).into();
        Ok(SignedTransaction {
            hash: keccak256(&raw),
            raw,
            signature,
        })
    }
}
