//! Transaction encoding and signing.
//!
//! - [`rlp`]: flat RLP list encoding
//! - [`legacy`]: EIP-155 legacy transactions and their signatures
//! - [`calldata`]: ABI call data for token transfers and registry lookups

pub mod calldata;
pub mod legacy;
pub mod rlp;

pub use calldata::encode_transfer_call;
pub use legacy::{
    LegacyTransaction, RecoverableSignature, SignedTransaction, TxSignature, eip155_v, sign_hash,
};
