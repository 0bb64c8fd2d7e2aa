use alloy::{
    primitives::{hex, Address, B256},
    signers::local::LocalSigner,
};
use k256::ecdsa::SigningKey;
use std::{fmt, str::FromStr};

pub(crate) type K256LocalSigner = LocalSigner<SigningKey>;

/// Errors from loading a private key.
#[derive(thiserror::Error, Debug)]
pub enum KeyError {
    /// private key was not valid hex
    #[error("private key was not valid hex")]
    InvalidHex(#[from] hex::FromHexError),
    /// private key had the wrong length
    #[error("private key must be 32 bytes, got {0}")]
    InvalidLength(usize),
    /// private key is zero or not below the curve order
    #[error("invalid private key: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),
}

/// A 32-byte secp256k1 secret.
///
/// Only the length is checked on construction; whether the bytes form a usable scalar is
/// checked when signing. The key is never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(B256);

impl PrivateKey {
    /// Wrap raw key bytes.
    pub const fn from_bytes(bytes: B256) -> Self {
        Self(bytes)
    }

    /// Key from a byte slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 32 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        Ok(Self(B256::from_slice(bytes)))
    }

    /// Random key from the OS RNG.
    pub fn random() -> Self {
        Self(B256::from_slice(&K256LocalSigner::random().credential().to_bytes()))
    }

    /// The secret bytes.
    pub const fn as_bytes(&self) -> &B256 {
        &self.0
    }

    /// Ethereum address of the key.
    pub fn address(&self) -> Result<Address, KeyError> {
        Ok(self.signer()?.address())
    }

    pub(crate) fn signer(&self) -> Result<K256LocalSigner, KeyError> {
        let credential = SigningKey::from_slice(self.0.as_slice())?;
        Ok(K256LocalSigner::from_signing_key(credential))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    /// Parses 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s.trim())?;
        Self::from_slice(&decoded)
    }
}

impl From<[u8; 32]> for PrivateKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }
}
