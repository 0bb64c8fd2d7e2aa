use alloy::primitives::{keccak256, utils::eip191_hash_message, B256};
use serde::{Deserialize, Serialize};

/// What gets signed for a given encoding.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DigestMode {
    /// `keccak256(encoding)`, verified on chain with `ecrecover(keccak256(abi.encode(..)), ..)`
    #[default]
    Raw,
    /// `keccak256("\x19Ethereum Signed Message:\n" ‖ len ‖ encoding)`
    Eip191,
}

impl DigestMode {
    /// Digest of `encoded` under this mode.
    pub fn apply(self, encoded: &[u8]) -> B256 {
        match self {
            Self::Raw => hash(encoded),
            Self::Eip191 => eip191_hash_message(encoded),
        }
    }
}

/// Keccak-256 of the encoded parameters.
pub fn hash(encoded: &[u8]) -> B256 {
    keccak256(encoded)
}

/// Digest of `encoded` under `mode`.
pub fn digest(encoded: &[u8], mode: DigestMode) -> B256 {
    mode.apply(encoded)
}
