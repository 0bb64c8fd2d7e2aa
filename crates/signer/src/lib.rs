//! Signatures over ABI-encoded mint parameters.
//!
//! The pipeline is encode → hash → sign:
//!
//! 1. [`encode`] the [`ParameterList`] exactly like Solidity's `abi.encode(...)`,
//! 2. [`hash`] the encoding with Keccak-256 (optionally behind the EIP-191 prefix, see
//!    [`DigestMode`]),
//! 3. [`sign`] the digest with a secp256k1 [`PrivateKey`], normalising `v` per
//!    [`RecoveryConvention`].
//!
//! [`SignatureGenerator`] bundles the caller's choices and runs all three steps. Everything here
//! is stateless and safe to share across threads.

mod digest;
mod generator;
mod key;
mod request;
mod signature;

pub use digest::{digest, hash, DigestMode};
pub use generator::{sign, SignatureGenerator, SignedPayload};
pub use key::{KeyError, PrivateKey};
pub use request::{SigningRequest, CHAIN_ID_FIELD};
pub use signature::{RecoveryConvention, Signature};

pub use mintsig_abi::{
    decode, encode, AbiType, EncodingError, Field, ParameterList, Preset, Schema, TypedValue,
};

/// Errors from signing.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// parameters could not be encoded
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// private key is not usable
    #[error(transparent)]
    InvalidKey(#[from] KeyError),
    /// error from the alloy signer
    #[error("signer error: {0}")]
    Signer(#[from] alloy::signers::Error),
    /// signature bytes could not be parsed
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// public key could not be recovered from a signature
    #[error("signature recovery failed: {0}")]
    Recovery(#[from] alloy::primitives::SignatureError),
    /// signing request is inconsistent
    #[error("invalid signing request: {0}")]
    InvalidRequest(&'static str),
}
